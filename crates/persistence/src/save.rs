use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sim_core::{parse_kv, KvWriter, ReignState, ValidationError, YearPhase, YearReport};
use tracing::{debug, warn};

use crate::PersistenceError;

/// Save file used when none is given.
pub fn default_save_path() -> PathBuf {
    PathBuf::from("game_save.txt")
}

/// Render a state as save text.
pub fn encode_state(state: &ReignState) -> String {
    let r = &state.last_year;
    KvWriter::new()
        .put("year", state.year)
        .put("population", state.population)
        .put("grain", state.grain)
        .put("land", state.land)
        .put("starvedLastYear", r.starved)
        .put("immigrantsLastYear", r.immigrants)
        .put_flag("plagueLastYear", r.plague)
        .put("yieldPerAcreLastYear", r.yield_per_acre)
        .put("harvestTotalLastYear", r.harvest)
        .put("ratsAteLastYear", r.rats_ate)
        .put("landPriceThisYear", state.land_price)
        .put_flag("awaitingPlayerDecisions", state.phase.is_awaiting_decisions())
        .put("yearsCompleted", state.years_completed)
        .put("starvationPercentSum", state.starvation_percent_sum)
        .finish()
}

/// Parse save text. Every key is required and the result must be resumable.
pub fn decode_state(text: &str) -> Result<ReignState, ValidationError> {
    let kv = parse_kv(text);
    let phase = if kv.flag("awaitingPlayerDecisions")? {
        YearPhase::AwaitingDecisions
    } else {
        YearPhase::PriceUnset
    };
    let state = ReignState {
        year: kv.count("year")?,
        population: kv.int("population")?,
        grain: kv.decimal("grain")?,
        land: kv.int("land")?,
        last_year: YearReport {
            starved: kv.int("starvedLastYear")?,
            immigrants: kv.int("immigrantsLastYear")?,
            plague: kv.flag("plagueLastYear")?,
            yield_per_acre: kv.int("yieldPerAcreLastYear")?,
            harvest: kv.int("harvestTotalLastYear")?,
            rats_ate: kv.int("ratsAteLastYear")?,
        },
        land_price: kv.int("landPriceThisYear")?,
        phase,
        years_completed: kv.count("yearsCompleted")?,
        starvation_percent_sum: kv.decimal("starvationPercentSum")?,
    };
    state.validate()?;
    Ok(state)
}

/// Somewhere a single reign can be parked between sessions.
pub trait SaveSlot {
    /// The saved reign, or `None` when there is none or it is unusable.
    fn load(&self) -> Option<ReignState>;
    /// Replace whatever is saved with `state`.
    fn store(&mut self, state: &ReignState) -> Result<(), PersistenceError>;
    /// Forget the saved reign. Clearing an empty slot succeeds.
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// Save slot backed by one text file.
#[derive(Clone, Debug)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SaveSlot for FileSlot {
    fn load(&self) -> Option<ReignState> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no save file");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "save unreadable, ignoring");
                return None;
            }
        };
        match decode_state(&text) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "save corrupt, ignoring");
                None
            }
        }
    }

    fn store(&mut self, state: &ReignState) -> Result<(), PersistenceError> {
        fs::write(&self.path, encode_state(state)).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), year = state.year, "saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Save slot held in memory as save text, for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    text: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with arbitrary save text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Raw save text, if anything is saved.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl SaveSlot for MemorySlot {
    fn load(&self) -> Option<ReignState> {
        let text = self.text.as_deref()?;
        decode_state(text)
            .map_err(|e| warn!(error = %e, "save corrupt, ignoring"))
            .ok()
    }

    fn store(&mut self, state: &ReignState) -> Result<(), PersistenceError> {
        self.text = Some(encode_state(state));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.text = None;
        Ok(())
    }
}
