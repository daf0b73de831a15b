//! A minimal arcade game, so that captures run without an external emulator.
//!
//! In Catcher a ball falls from the top of the screen and the player moves a
//! paddle along the bottom row. A caught ball scores one point, a missed ball
//! costs a life.
use anyhow::{bail, Result};
use capture_core::{
    registry::EnvSpec,
    score_tracking::{Emulator, FrameSkip, ScoreTracking},
    Obs, VecEnv,
};

/// Family of the games in this module.
pub const FAMILY: &str = "arcade";

/// Games in this module.
pub const ARCADE_SPECS: &[EnvSpec] = &[
    EnvSpec::new("Catcher-v0", "capture_gameplay.arcade:Catcher"),
    EnvSpec::new("CatcherNoFrameskip-v0", "capture_gameplay.arcade:Catcher"),
];

const WIDTH: usize = 8;
const HEIGHT: usize = 10;
const START_LIVES: u32 = 3;

// NOOP, RIGHT, LEFT
const ACTION_SET: [i64; 3] = [0, 3, 4];

/// Number of actions of Catcher.
pub const N_ACTIONS: i64 = ACTION_SET.len() as i64;

/// Screens of one or more games, row-major, one byte per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen(pub Vec<Vec<u8>>);

impl Obs for Screen {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn stack(slots: Vec<Self>) -> Self {
        Screen(slots.into_iter().flat_map(|s| s.0).collect())
    }
}

/// The Catcher game.
pub struct Catcher {
    rng: fastrand::Rng,
    paddle: usize,
    ball: (usize, usize),
    lives: u32,
}

impl Catcher {
    /// Constructs a game with a seeded ball dropper.
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: fastrand::Rng::with_seed(seed),
            paddle: WIDTH / 2,
            ball: (0, 0),
            lives: START_LIVES,
        };
        game.drop_ball();
        game
    }

    fn drop_ball(&mut self) {
        self.ball = (0, self.rng.usize(..WIDTH));
    }
}

impl Emulator for Catcher {
    type Obs = Screen;

    fn action_set(&self) -> &[i64] {
        &ACTION_SET
    }

    fn act(&mut self, action: i64) -> f32 {
        if self.game_over() {
            return 0.0;
        }

        match action {
            3 => self.paddle = (self.paddle + 1).min(WIDTH - 1),
            4 => self.paddle = self.paddle.saturating_sub(1),
            _ => {}
        }

        self.ball.0 += 1;
        if self.ball.0 < HEIGHT - 1 {
            return 0.0;
        }

        let reward = if self.ball.1 == self.paddle {
            1.0
        } else {
            self.lives -= 1;
            0.0
        };
        self.drop_ball();
        reward
    }

    fn game_over(&self) -> bool {
        self.lives == 0
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn observe(&self) -> Screen {
        let mut pixels = vec![0u8; WIDTH * HEIGHT];
        pixels[(HEIGHT - 1) * WIDTH + self.paddle] = 128;
        pixels[self.ball.0 * WIDTH + self.ball.1] = 255;
        Screen(vec![pixels])
    }

    fn reset_game(&mut self) {
        self.lives = START_LIVES;
        self.paddle = WIDTH / 2;
        self.drop_ball();
    }
}

/// Builds `num_env` instances of the game `env_id` as a single environment.
pub fn build_env(env_id: &str, num_env: usize, seed: i64) -> Result<VecEnv<ScoreTracking<Catcher>>> {
    let frame_skip = match env_id {
        "Catcher-v0" => FrameSkip::Random { low: 2, high: 5 },
        "CatcherNoFrameskip-v0" => FrameSkip::Fixed(1),
        _ => bail!("{} is not a game of the {} family", env_id, FAMILY),
    };

    let envs = (0..num_env as u64)
        .map(|i| {
            let seed = (seed as u64).wrapping_add(i);
            ScoreTracking::new(Catcher::new(seed))
                .frame_skip(frame_skip.clone())
                .seed(seed)
        })
        .collect();
    VecEnv::new(envs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture_core::Env;

    // Moves the paddle under the ball and lets it fall.
    fn catch(game: &mut Catcher) -> f32 {
        let mut reward = 0.0;
        while reward == 0.0 {
            let action = match game.ball.1 {
                c if c > game.paddle => 3,
                c if c < game.paddle => 4,
                _ => 0,
            };
            let lives = game.lives;
            reward = game.act(action);
            assert_eq!(game.lives, lives);
        }
        reward
    }

    #[test]
    fn test_caught_ball_scores() {
        let mut game = Catcher::new(1);
        for _ in 0..5 {
            assert_eq!(catch(&mut game), 1.0);
        }
        assert_eq!(game.lives(), START_LIVES);
    }

    #[test]
    fn test_missed_balls_end_the_game() {
        let mut game = Catcher::new(2);
        let mut ticks = 0;
        while !game.game_over() {
            // Keep the paddle away from the ball.
            let action = if game.ball.1 >= WIDTH / 2 { 4 } else { 3 };
            assert_eq!(game.act(action), 0.0);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(game.act(0), 0.0);
        game.reset_game();
        assert_eq!(game.lives(), START_LIVES);
    }

    #[test]
    fn test_screen_marks_ball_and_paddle() {
        let game = Catcher::new(3);
        let Screen(frames) = game.observe();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].iter().filter(|&&p| p == 255).count(), 1);
        assert_eq!(frames[0][(HEIGHT - 1) * WIDTH + WIDTH / 2], 128);
    }

    #[test]
    fn test_build_env() -> Result<()> {
        let mut env = build_env("CatcherNoFrameskip-v0", 3, 0)?;
        assert_eq!(env.n_envs(), 3);
        assert_eq!(env.reset()?.len(), 3);
        assert_eq!(env.lives(), START_LIVES);
        assert!(build_env("Pong-v0", 1, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_build_env_with_negative_seed() -> Result<()> {
        let mut env = build_env("Catcher-v0", 2, -1)?;
        assert_eq!(env.n_envs(), 2);
        assert_eq!(env.reset()?.len(), 2);
        Ok(())
    }
}
