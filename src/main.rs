//! Productivity Arcade entry point
//!
//! The browser build starts from `web::start`. Natively this runs a headless
//! autopilot round of each game and prints the tracker summary.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Productivity Arcade (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match productivity_arcade::Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => productivity_arcade::Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!("Running demo with seed: {}", seed);

    let mut board = productivity_arcade::TaskBoard::with_default_tasks();
    demo::run_scroller(&settings, seed, &mut board);
    demo::run_stacker(&settings, seed.wrapping_add(1), &mut board);

    match serde_json::to_string_pretty(&board.summary()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize tracker summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Simple autopilots that drive the sessions through their public inputs
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use productivity_arcade::consts::PHYSICS_TICK_MS;
    use productivity_arcade::session::{ScrollerInput, StackerInput};
    use productivity_arcade::sim::stacker::{Grid, Piece};
    use productivity_arcade::{ScrollerSession, Settings, StackerSession, TaskBoard};

    /// Demo rounds stop here even if the autopilot never dies
    const MAX_DEMO_MS: u32 = 120_000;

    pub fn run_scroller(settings: &Settings, seed: u64, board: &mut TaskBoard) {
        let mut session = ScrollerSession::seeded(settings, seed);
        session.handle(ScrollerInput::Start);

        let mut elapsed = 0;
        while session.is_running() && elapsed < MAX_DEMO_MS {
            if should_jump(&session) {
                session.handle(ScrollerInput::Jump);
            }
            session.advance(PHYSICS_TICK_MS);
            board.record_scroller(&session.snapshot());
            elapsed += PHYSICS_TICK_MS;
        }

        let snap = session.snapshot();
        log::info!(
            "Side-scroller demo: score {}, {}s, cause {:?}",
            snap.score,
            snap.elapsed_secs,
            snap.cause
        );
    }

    /// Jump when falling below the middle of the next gap
    fn should_jump(session: &ScrollerSession) -> bool {
        let state = session.state();
        let config = state.config();
        let actor = state.actor();
        let target = state
            .obstacles()
            .find(|o| o.trailing_edge(config.obstacle_width) >= config.lane_x)
            .map(|o| (o.gap_top + o.gap_bottom) / 2.0)
            .unwrap_or_else(|| config.start_y());
        actor.velocity >= 0.0 && actor.y + config.actor_height / 2.0 > target
    }

    pub fn run_stacker(settings: &Settings, seed: u64, board: &mut TaskBoard) {
        let mut session = StackerSession::seeded(settings, seed);
        session.handle(StackerInput::Start);

        let mut elapsed = 0;
        while session.is_running() && elapsed < MAX_DEMO_MS {
            steer(&mut session);
            let step = session.descent_interval().period_ms();
            session.advance(step);
            board.record_stacker(&session.snapshot());
            elapsed += step;
        }

        let snap = session.snapshot();
        log::info!(
            "Block-stacker demo: score {}, level {}, {} lines",
            snap.score,
            snap.level,
            snap.lines_cleared
        );
    }

    /// Nudge the piece one column toward the lowest stack
    fn steer(session: &mut StackerSession) {
        let state = session.state();
        let Some(piece) = state.piece() else {
            return;
        };
        let target = lowest_column(state.grid(), piece);
        let input = if piece.x > target {
            StackerInput::MoveLeft
        } else if piece.x < target {
            StackerInput::MoveRight
        } else {
            return;
        };
        session.handle(input);
    }

    /// Leftmost origin column whose span has the most free rows on top
    fn lowest_column(grid: &Grid, piece: &Piece) -> i32 {
        let span = piece.shape.width();
        let depth = |x: usize| {
            (0..grid.height())
                .take_while(|&y| grid.get(x as i32, y as i32).is_some_and(|c| !c.is_filled()))
                .count()
        };
        (0..=grid.width().saturating_sub(span))
            .max_by_key(|&x| ((x..x + span).map(depth).min().unwrap_or(0), std::cmp::Reverse(x)))
            .unwrap_or(0) as i32
    }
}
