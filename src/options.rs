use std::str::FromStr;

use lifegrid::{Grid, LifeError, Result, SimConfig, engine};

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    /// Parses the arguments, returning `Ok(None)` when only help was requested
    pub fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("", "headless", "step without the terminal UI");
        opts.optflag("t", "threads", "compute generations on the rayon pool");
        opts.optopt("s", "size", "grid size (presets 25, 35, 42, 50)", "N");
        opts.optopt(
            "d",
            "delay",
            "milliseconds between generations (10-1000)",
            "MILLIS",
        );
        opts.optopt("p", "density", "chance of a random cell being alive", "P");
        opts.optopt("f", "fill", "initial fill: random, empty, alternating, all", "TYPE");
        opts.optopt("", "pattern", "seed the center of the board with an RLE pattern", "RLE");
        opts.optopt("g", "gens", "stop after this many generations", "COUNT");

        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .map_err(|e| LifeError::Options(e.to_string()))?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: lifegrid [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    fn get<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.matches
            .opt_get(name)
            .map_err(|e| LifeError::Options(format!("--{name}: {e}")))
    }

    pub fn config(&self) -> Result<SimConfig> {
        let defaults = SimConfig::default();
        SimConfig::new(
            self.get("size")?.unwrap_or(defaults.grid_size()),
            self.get("delay")?.unwrap_or(defaults.step_interval_ms()),
            self.get("density")?.unwrap_or(defaults.live_probability()),
        )
    }

    pub fn headless(&self) -> bool {
        self.matches.opt_present("headless")
    }
    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }

    pub fn generations(&self) -> Result<Option<u64>> {
        self.get("gens")
    }

    pub fn fill_mode(&self) -> Result<FillMode> {
        let mode_str = self.matches.opt_str("fill");
        let mode_str = mode_str.as_deref().unwrap_or("empty");
        FillMode::new(mode_str).ok_or_else(|| LifeError::Options(format!("unknown fill mode {mode_str:?}")))
    }

    pub fn pattern(&self) -> Option<String> {
        self.matches.opt_str("pattern")
    }
}

pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    /// Builds the starting `size x size` board
    pub fn create_grid(self, config: &SimConfig) -> Result<Grid> {
        let size = config.grid_size();
        match self {
            Self::Random => engine::randomize(size, size, config.live_probability()),
            Self::Empty => engine::empty_grid(size, size),
            Self::All => Grid::from_alive(
                size,
                size,
                (0..size).flat_map(|row| (0..size).map(move |col| (row, col))),
            ),
            Self::Alternating => Grid::from_alive(
                size,
                size,
                (0..size)
                    .flat_map(|row| (0..size).map(move |col| (row, col)))
                    .filter(|(row, col)| (row + col) % 2 == 0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid::Coord;

    fn args(list: &[&str]) -> Args {
        Args::new(list).expect("valid args").expect("not help")
    }

    fn config(size: usize) -> SimConfig {
        SimConfig::new(size, 100, 0.3).unwrap()
    }

    #[test]
    fn fill_mode_parses() {
        let args = args(&["--fill", "alternating"]);

        assert!(matches!(args.fill_mode(), Ok(FillMode::Alternating)));
    }

    #[test]
    fn unknown_fill_mode_is_rejected() {
        let args = args(&["-f", "checkers"]);

        assert!(matches!(args.fill_mode(), Err(LifeError::Options(_))));
    }

    #[test]
    fn config_uses_flags_and_defaults() {
        let config = args(&["-s", "25", "--delay", "250"]).config().unwrap();

        assert_eq!(config.grid_size(), 25);
        assert_eq!(config.step_interval_ms(), 250);
        assert_eq!(config.live_probability(), 0.3);
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(matches!(
            args(&["--size", "abc"]).config(),
            Err(LifeError::Options(_))
        ));
        assert!(matches!(
            args(&["--delay", "5"]).config(),
            Err(LifeError::InvalidStepInterval(5))
        ));
        assert!(matches!(
            args(&["--size", "0"]).config(),
            Err(LifeError::InvalidGridSize(0))
        ));
    }

    #[test]
    fn help_short_circuits() {
        assert!(matches!(Args::new(&["--help"]), Ok(None)));
        assert!(Args::new(&["--bogus"]).is_err());
    }

    #[test]
    fn create_grid_all_fills_grid() {
        let grid = FillMode::All.create_grid(&config(3)).unwrap();

        assert_eq!(grid.alive_count(), 9);
    }

    #[test]
    fn create_grid_empty_is_empty() {
        let grid = FillMode::Empty.create_grid(&config(5)).unwrap();

        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn create_grid_alternating_uses_parity() {
        let grid = FillMode::Alternating.create_grid(&config(3)).unwrap();

        let expected = vec![
            Coord::new(0, 0),
            Coord::new(0, 2),
            Coord::new(1, 1),
            Coord::new(2, 0),
            Coord::new(2, 2),
        ];
        assert_eq!(grid.alive().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn create_grid_random_has_board_size() {
        let grid = FillMode::Random.create_grid(&config(4)).unwrap();

        assert_eq!((grid.rows(), grid.cols()), (4, 4));
    }
}
