//! Live quote port trait.

use crate::domain::error::TraderError;
use crate::domain::order::Tick;

pub trait TickPort {
    fn get_tick(&self, instrument: &str) -> Result<Tick, TraderError>;
}
