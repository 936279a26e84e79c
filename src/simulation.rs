use crate::config::{ConfigError, SimConfig};
use crate::constants::GENERATION_LOG_INTERVAL;
use rand::Rng;
use rand::rngs::StdRng;
use rayon::prelude::*;

pub type SimRng = StdRng;

// --- Core Data Structures ---

/// Boundary identification applied to the ghost border each generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Ghost cells fixed at 0 (dead edge).
    Flat,
    /// Opposite edges identified directly; the board is a torus.
    Toroidal,
    /// Left/right edges identified directly, top/bottom identified with a
    /// half-twist (row index reversed).
    Mobius,
}

/// Transition-rule variant. The fade rule is a deliberate departure from
/// canonical Life: losers decay geometrically instead of dying outright,
/// leaving a visible trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RuleVariant {
    Strict,
    Fade,
}

impl RuleVariant {
    /// Life threshold for a cell value. Bound to the rule variant, never the
    /// topology: under Fade, decayed trail values below 1.0 must not count
    /// as live neighbors.
    #[inline]
    pub fn is_alive(self, value: f32) -> bool {
        match self {
            RuleVariant::Strict => value >= 0.5,
            RuleVariant::Fade => value == 1.0,
        }
    }
}

/// A 2-D cell grid with a one-cell ghost border on every side. Interior
/// coordinates are `(x, y)` with `x < width`, `y < height`; the physical
/// array is `(width + 2) * (height + 2)`, row-major.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<f32>,
    width: usize,
    height: usize,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![0.0; (width + 2) * (height + 2)],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn padded_width(&self) -> usize {
        self.width + 2
    }

    /// Padded index of interior cell `(x, y)`.
    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x + 1 + (y + 1) * (self.width + 2)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }

    /// Ghost cell at padded coordinates `(px, py)` where `px < width + 2`
    /// and `py < height + 2`. Interior cells are reachable too; tests use
    /// this to check boundary identities.
    #[inline]
    pub fn padded(&self, px: usize, py: usize) -> f32 {
        self.cells[px + py * (self.width + 2)]
    }

    /// Raw padded cell data, ghost border included. Read-only; the renderer
    /// and the GPU uploader consume this.
    #[inline]
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Seed the interior with uniform {0, 1} values. Ghost cells are left
    /// untouched; `apply_boundary` owns them.
    pub fn randomize(&mut self, rng: &mut SimRng, density: f64) {
        for y in 0..self.height {
            for x in 0..self.width {
                let v = if rng.gen_bool(density) { 1.0 } else { 0.0 };
                self.set(x, y, v);
            }
        }
    }

    fn clear(&mut self) {
        self.cells.fill(0.0);
    }
}

/// The 8 Moore-neighborhood offsets expressed as signed strides into the
/// padded array. Derived from the board width behind this constructor so a
/// dimension change always regenerates them together.
#[derive(Debug, Clone)]
pub struct NeighborOffsets {
    strides: [isize; 8],
}

impl NeighborOffsets {
    pub fn for_board(width: usize) -> Self {
        let pw = (width + 2) as isize;
        Self {
            strides: [
                -pw - 1,
                -pw,
                -pw + 1,
                -1,
                // center skipped
                1,
                pw - 1,
                pw,
                pw + 1,
            ],
        }
    }

    #[inline]
    pub fn strides(&self) -> &[isize; 8] {
        &self.strides
    }
}

// --- Topology Mapper ---

/// Populates the ghost border in place; interior cells are never touched.
/// This is the only place boundary semantics are decided - the transition
/// step reads ghost cells as ordinary neighbors.
pub fn apply_boundary(board: &mut Board, topology: Topology) {
    let w = board.width;
    let h = board.height;
    let pw = w + 2;
    let cells = &mut board.cells;

    match topology {
        Topology::Flat => {
            for x in 0..pw {
                cells[x] = 0.0;
                cells[(h + 1) * pw + x] = 0.0;
            }
            for y in 1..=h {
                cells[y * pw] = 0.0;
                cells[y * pw + w + 1] = 0.0;
            }
        }
        Topology::Toroidal => {
            for y in 1..=h {
                cells[y * pw] = cells[y * pw + w];
                cells[y * pw + w + 1] = cells[y * pw + 1];
            }
            for x in 1..=w {
                cells[x] = cells[h * pw + x];
                cells[(h + 1) * pw + x] = cells[pw + x];
            }
            cells[0] = cells[h * pw + w];
            cells[w + 1] = cells[h * pw + 1];
            cells[(h + 1) * pw] = cells[pw + w];
            cells[(h + 1) * pw + w + 1] = cells[pw + 1];
        }
        Topology::Mobius => {
            // Columns wrap directly, same row.
            for y in 1..=h {
                cells[y * pw] = cells[y * pw + w];
                cells[y * pw + w + 1] = cells[y * pw + 1];
            }
            // Rows wrap with the half-twist: the ghost row is the opposite
            // interior row reversed. Reversal runs over the full padded
            // width so the corners follow the same identification.
            for x in 0..pw {
                cells[x] = cells[h * pw + (pw - 1 - x)];
                cells[(h + 1) * pw + x] = cells[pw + (pw - 1 - x)];
            }
        }
    }
}

// --- Transition Engine ---

/// The rule table, as a pure function of (alive, neighbor sum) -> next
/// value. Both the host row loop below and the WGSL kernel in `life.wgsl`
/// are thin adapters around this table:
///
///   live cell:  survives iff sum in [2, 4), else loses
///   dead cell:  born     iff sum in [3, 4), else loses
///   winner  -> 1.0 exactly
///   loser   -> 0.0 (Strict) or old * fade_const (Fade)
///
/// A cell with exactly 4 live neighbors is outside both half-open ranges
/// and always loses.
#[inline]
pub fn apply_rule(alive: bool, sum: f32, old: f32, rule: RuleVariant, fade_const: f32) -> f32 {
    let wins = if alive {
        sum >= 2.0 && sum < 4.0
    } else {
        sum >= 3.0 && sum < 4.0
    };
    if wins {
        1.0
    } else {
        match rule {
            RuleVariant::Strict => 0.0,
            RuleVariant::Fade => old * fade_const,
        }
    }
}

/// One generation: reads `current` (ghost border included, already
/// populated by `apply_boundary`) and writes the interior of `next`. Ghost
/// cells of `next` are not written; the next boundary pass owns them. Rows
/// are independent, so the loop runs per-row on the rayon pool.
pub fn step(
    current: &Board,
    next: &mut Board,
    offsets: &NeighborOffsets,
    rule: RuleVariant,
    fade_const: f32,
) {
    debug_assert_eq!(current.width, next.width);
    debug_assert_eq!(current.height, next.height);

    let w = current.width;
    let pw = current.padded_width();
    let src = &current.cells;

    next.cells
        .par_chunks_mut(pw)
        .skip(1)
        .take(current.height)
        .enumerate()
        .for_each(|(row, out)| {
            let base = ((row + 1) * pw) as isize;
            for x in 1..=w {
                let index = base + x as isize;
                let mut sum = 0.0f32;
                for &stride in offsets.strides() {
                    if rule.is_alive(src[(index + stride) as usize]) {
                        sum += 1.0;
                    }
                }
                let old = src[index as usize];
                out[x] = apply_rule(rule.is_alive(old), sum, old, rule, fade_const);
            }
        });
}

// --- Double-Buffer Manager ---

/// Owns both boards. Exactly one is "current" (readable by rendering) and
/// one is "next" (write target of the in-progress step); the roles are
/// exchanged by flipping an index tag, never by copying data.
#[derive(Debug)]
pub struct BoardPair {
    boards: [Board; 2],
    current: usize,
}

impl BoardPair {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            boards: [Board::new(width, height), Board::new(width, height)],
            current: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> &Board {
        &self.boards[self.current]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut Board {
        &mut self.boards[self.current]
    }

    /// Borrow (current, next) for the duration of one step. The borrow
    /// checker guarantees no swap can happen while the pair is split.
    pub fn split(&mut self) -> (&Board, &mut Board) {
        let (a, b) = self.boards.split_at_mut(1);
        if self.current == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// O(1) role exchange. Must only be called after a step has fully
    /// completed (boundary + transition).
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    fn clear(&mut self) {
        self.boards[0].clear();
        self.boards[1].clear();
        self.current = 0;
    }
}

// --- Generation Scheduler ---

/// Fixed-period catch-up clock decoupling the simulation rate from the
/// frame rate. The reference timestamp only ever advances by whole periods;
/// it is never reset to "now", so a stalled render loop fast-forwards
/// through the missed generations instead of dropping them.
#[derive(Debug)]
pub struct GenerationClock {
    reference: f64,
    period: f64,
}

impl GenerationClock {
    pub fn new(period: f64, now: f64) -> Self {
        Self {
            reference: now,
            period,
        }
    }

    /// Consume at most one period of elapsed time. Callers loop this, doing
    /// one simulation step per `true`.
    #[inline]
    pub fn tick(&mut self, now: f64) -> bool {
        if now - self.reference > self.period {
            self.reference += self.period;
            true
        } else {
            false
        }
    }

    /// Move the reference to `now`, discarding accumulated time. Only used
    /// while paused; unpausing must not fast-forward through the pause.
    pub fn resync(&mut self, now: f64) {
        self.reference = now;
    }

    #[inline]
    pub fn reference(&self) -> f64 {
        self.reference
    }
}

// --- Simulation Facade ---

/// Owns the board pair, offsets, clock and generation counter, and wires the
/// boundary pass, transition step and buffer swap into single generations.
pub struct SimulationState {
    config: SimConfig,
    boards: BoardPair,
    offsets: NeighborOffsets,
    clock: GenerationClock,
    generation: u64,
    is_paused: bool,
}

impl SimulationState {
    /// Fails fast on an invalid parameter block; nothing is allocated until
    /// the config has been validated.
    pub fn new(config: SimConfig, rng: &mut SimRng, now: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut boards = BoardPair::new(config.width, config.height);
        boards.current_mut().randomize(rng, config.initial_density);
        // The border is boundary-mapped before first use, never left
        // uninitialized.
        apply_boundary(boards.current_mut(), config.topology);
        let offsets = NeighborOffsets::for_board(config.width);
        let clock = GenerationClock::new(config.period, now);
        log::info!(
            "simulation ready: {}x{} {:?}/{:?}, period {:.4}s",
            config.width,
            config.height,
            config.topology,
            config.rule,
            config.period
        );
        Ok(Self {
            config,
            boards,
            offsets,
            clock,
            generation: 0,
            is_paused: false,
        })
    }

    /// One full generation: boundary fix, transition, swap. Runs to
    /// completion once started; the swap is the last action, so no reader
    /// ever observes a mid-step "next" board.
    pub fn step(&mut self) {
        apply_boundary(self.boards.current_mut(), self.config.topology);
        {
            let (current, next) = self.boards.split();
            step(
                current,
                next,
                &self.offsets,
                self.config.rule,
                self.config.fade_const,
            );
        }
        self.boards.swap();
        self.generation += 1;
        log::debug!("generation: {}", self.generation);
        if self.generation % GENERATION_LOG_INTERVAL == 0 {
            log::info!("generation: {}", self.generation);
        }
    }

    /// Catch-up poll, called once per rendered frame. Performs one step per
    /// elapsed period and returns how many were taken.
    pub fn advance(&mut self, now: f64) -> u32 {
        if self.is_paused {
            self.clock.resync(now);
            return 0;
        }
        let mut steps = 0;
        while self.clock.tick(now) {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Catch-up poll for the GPU backend: the clock and generation counter
    /// advance here, the transitions themselves run as compute passes
    /// encoded by the caller. Returns how many generations are due.
    pub fn advance_pending(&mut self, now: f64) -> u32 {
        if self.is_paused {
            self.clock.resync(now);
            return 0;
        }
        let mut steps = 0;
        while self.clock.tick(now) {
            self.generation += 1;
            if self.generation % GENERATION_LOG_INTERVAL == 0 {
                log::info!("generation: {}", self.generation);
            }
            steps += 1;
        }
        steps
    }

    #[inline]
    pub fn current(&self) -> &Board {
        self.boards.current()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
        log::info!(
            "simulation {}",
            if self.is_paused { "paused" } else { "resumed" }
        );
    }

    /// Reseed and start over; the parameter block stays as configured.
    pub fn restart(&mut self, rng: &mut SimRng, now: f64) {
        log::info!("restarting simulation with new seed");
        self.boards.clear();
        self.boards
            .current_mut()
            .randomize(rng, self.config.initial_density);
        apply_boundary(self.boards.current_mut(), self.config.topology);
        self.clock = GenerationClock::new(self.config.period, now);
        self.generation = 0;
        self.is_paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;

    fn seeded_board(w: usize, h: usize, seed: u64) -> Board {
        let mut rng = SimRng::seed_from_u64(seed);
        let mut board = Board::new(w, h);
        board.randomize(&mut rng, 0.5);
        board
    }

    #[test]
    fn toroidal_ghosts_mirror_opposite_edges() {
        let mut board = seeded_board(7, 5, 42);
        apply_boundary(&mut board, Topology::Toroidal);
        let (w, h) = (7, 5);
        // Row ghosts: padded row 0 mirrors interior row h; padded row h+1
        // mirrors interior row 1.
        for x in 1..=w {
            assert_eq!(board.padded(x, 0), board.padded(x, h));
            assert_eq!(board.padded(x, h + 1), board.padded(x, 1));
        }
        for y in 1..=h {
            assert_eq!(board.padded(0, y), board.padded(w, y));
            assert_eq!(board.padded(w + 1, y), board.padded(1, y));
        }
        // Corners wrap both axes.
        assert_eq!(board.padded(0, 0), board.padded(w, h));
        assert_eq!(board.padded(w + 1, 0), board.padded(1, h));
        assert_eq!(board.padded(0, h + 1), board.padded(w, 1));
        assert_eq!(board.padded(w + 1, h + 1), board.padded(1, 1));
    }

    #[test]
    fn mobius_rows_reverse_and_columns_do_not() {
        let mut board = seeded_board(6, 4, 7);
        apply_boundary(&mut board, Topology::Mobius);
        let (w, h) = (6, 4);
        let pw = w + 2;
        // Top ghost row equals the bottom interior row reversed, and vice
        // versa (reversal over the padded width, corners included).
        for x in 0..pw {
            assert_eq!(board.padded(x, 0), board.padded(pw - 1 - x, h));
            assert_eq!(board.padded(x, h + 1), board.padded(pw - 1 - x, 1));
        }
        // Column wraps stay unreversed.
        for y in 1..=h {
            assert_eq!(board.padded(0, y), board.padded(w, y));
            assert_eq!(board.padded(w + 1, y), board.padded(1, y));
        }
    }

    #[test]
    fn flat_ghosts_are_dead() {
        let mut board = seeded_board(5, 5, 3);
        // Dirty the border first so the test actually exercises the clear.
        let pw = 7;
        for i in 0..pw {
            board.cells[i] = 1.0;
            board.cells[6 * pw + i] = 1.0;
        }
        apply_boundary(&mut board, Topology::Flat);
        for x in 0..pw {
            assert_eq!(board.padded(x, 0), 0.0);
            assert_eq!(board.padded(x, 6), 0.0);
        }
        for y in 0..7 {
            assert_eq!(board.padded(0, y), 0.0);
            assert_eq!(board.padded(6, y), 0.0);
        }
    }

    #[test]
    fn boundary_never_touches_interior() {
        let board = seeded_board(8, 8, 11);
        for topology in [Topology::Flat, Topology::Toroidal, Topology::Mobius] {
            let mut mapped = board.clone();
            apply_boundary(&mut mapped, topology);
            for y in 0..8 {
                for x in 0..8 {
                    assert_eq!(mapped.get(x, y), board.get(x, y));
                }
            }
        }
    }

    #[test]
    fn exactly_four_neighbors_always_loses() {
        // Boundary-value exactness: sum == 4.0 is outside both the survive
        // range [2, 4) and the birth range [3, 4).
        assert_eq!(apply_rule(true, 4.0, 1.0, RuleVariant::Strict, 0.5), 0.0);
        assert_eq!(apply_rule(false, 4.0, 0.0, RuleVariant::Strict, 0.5), 0.0);

        // Whole-step check: center cell with exactly 4 live neighbors.
        let mut current = Board::new(5, 5);
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            current.set(x, y, 1.0);
        }
        for center_alive in [true, false] {
            let mut cur = current.clone();
            cur.set(2, 2, if center_alive { 1.0 } else { 0.0 });
            apply_boundary(&mut cur, Topology::Flat);
            let mut next = Board::new(5, 5);
            let offsets = NeighborOffsets::for_board(5);
            step(&cur, &mut next, &offsets, RuleVariant::Strict, 0.5);
            assert_eq!(next.get(2, 2), 0.0);
        }
    }

    #[test]
    fn dead_grid_stays_dead() {
        let offsets = NeighborOffsets::for_board(6);
        for topology in [Topology::Flat, Topology::Toroidal, Topology::Mobius] {
            for rule in [RuleVariant::Strict, RuleVariant::Fade] {
                let mut pair = BoardPair::new(6, 6);
                for _ in 0..10 {
                    apply_boundary(pair.current_mut(), topology);
                    let (current, next) = pair.split();
                    step(current, next, &offsets, rule, 0.5);
                    pair.swap();
                }
                for y in 0..6 {
                    for x in 0..6 {
                        assert_eq!(pair.current().get(x, y), 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn block_still_life_is_stable() {
        let mut current = Board::new(8, 8);
        for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
            current.set(x, y, 1.0);
        }
        apply_boundary(&mut current, Topology::Flat);
        let mut next = Board::new(8, 8);
        let offsets = NeighborOffsets::for_board(8);
        step(&current, &mut next, &offsets, RuleVariant::Strict, 0.5);
        for y in 0..8 {
            for x in 0..8 {
                let expected = matches!((x, y), (3, 3) | (4, 3) | (3, 4) | (4, 4));
                assert_eq!(next.get(x, y), if expected { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn clock_catches_up_without_dropping_generations() {
        // Period 1, elapsed gap 5.5: exactly 5 ticks, reference advances by
        // exactly 5, leaving 0.5 of unconsumed time.
        let mut clock = GenerationClock::new(1.0, 0.0);
        let mut steps = 0;
        while clock.tick(5.5) {
            steps += 1;
        }
        assert_eq!(steps, 5);
        assert_eq!(clock.reference(), 5.0);
        // The leftover half period is consumed on a later poll.
        assert!(!clock.tick(5.9));
        assert!(clock.tick(6.1));
    }

    #[test]
    fn swap_is_a_role_exchange() {
        let mut pair = BoardPair::new(4, 4);
        let first = pair.current().cells().as_ptr();
        // Idempotent under inspection: no swap, same identity.
        assert_eq!(pair.current().cells().as_ptr(), first);
        pair.swap();
        let second = pair.current().cells().as_ptr();
        assert_ne!(first, second);
        pair.swap();
        assert_eq!(pair.current().cells().as_ptr(), first);
    }

    #[test]
    fn split_pairs_current_with_next() {
        let mut pair = BoardPair::new(4, 4);
        let current_ptr = pair.current().cells().as_ptr();
        let (current, next) = pair.split();
        assert_eq!(current.cells().as_ptr(), current_ptr);
        assert_ne!(current.cells().as_ptr(), next.cells().as_ptr());
    }

    #[test]
    fn fade_loser_decays_geometrically() {
        // A lone live cell has no neighbors, loses every step, and decays by
        // the fade constant each generation.
        let offsets = NeighborOffsets::for_board(5);
        let fade = 0.5;
        let mut pair = BoardPair::new(5, 5);
        pair.current_mut().set(2, 2, 1.0);
        let mut expected = 1.0f32;
        for _ in 0..6 {
            apply_boundary(pair.current_mut(), Topology::Flat);
            let (current, next) = pair.split();
            step(current, next, &offsets, RuleVariant::Fade, fade);
            pair.swap();
            expected *= fade;
            assert_eq!(pair.current().get(2, 2), expected);
        }
    }

    #[test]
    fn fade_winner_snaps_to_one() {
        // A block still-life under the fade rule keeps its cells at exactly
        // 1.0 while the surroundings decay.
        let mut current = Board::new(6, 6);
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            current.set(x, y, 1.0);
        }
        // A stale trail value next to the block must not count as alive.
        current.set(4, 2, 0.5);
        apply_boundary(&mut current, Topology::Flat);
        let mut next = Board::new(6, 6);
        let offsets = NeighborOffsets::for_board(6);
        step(&current, &mut next, &offsets, RuleVariant::Fade, 0.5);
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(next.get(x, y), 1.0);
        }
        assert_eq!(next.get(4, 2), 0.25);
    }

    #[test]
    fn facade_runs_generations_and_restarts() {
        let mut config = SimConfig::default();
        config.width = 16;
        config.height = 16;
        config.period = 1.0;
        let mut rng = SimRng::seed_from_u64(99);
        let mut sim = SimulationState::new(config, &mut rng, 0.0).unwrap();
        assert_eq!(sim.advance(3.5), 3);
        assert_eq!(sim.generation(), 3);
        // Pause resyncs the clock instead of accumulating missed periods.
        sim.toggle_pause();
        assert_eq!(sim.advance(100.0), 0);
        sim.toggle_pause();
        assert_eq!(sim.advance(100.5), 0);
        assert_eq!(sim.advance(101.5), 1);
        sim.restart(&mut rng, 200.0);
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut rng = SimRng::seed_from_u64(0);
        let mut config = SimConfig::default();
        config.width = 0;
        assert!(SimulationState::new(config, &mut rng, 0.0).is_err());

        let mut config = SimConfig::default();
        config.fade_const = 1.0;
        assert!(SimulationState::new(config, &mut rng, 0.0).is_err());

        let mut config = SimConfig::default();
        config.period = 0.0;
        assert!(SimulationState::new(config, &mut rng, 0.0).is_err());

        // Density outside [0, 1] must be a construction-rejected error, not
        // a panic inside seeding.
        let mut config = SimConfig::default();
        config.initial_density = 1.5;
        assert_eq!(
            SimulationState::new(config, &mut rng, 0.0).err(),
            Some(ConfigError::DensityOutOfRange(1.5))
        );

        // Board dimensions that pass on their own can still produce a field
        // texture larger than the device allows.
        let mut config = SimConfig::default();
        config.width = 1024;
        config.height = 1024;
        config.supersample = 16;
        assert_eq!(
            SimulationState::new(config, &mut rng, 0.0).err(),
            Some(ConfigError::FieldTooLarge(16384))
        );
    }
}
