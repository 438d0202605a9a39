extern crate itertools;
extern crate rand;
#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod error;
pub mod feed_forward;
pub mod layers;
pub mod task;
pub mod trainer;

mod matrix;
mod utils;

pub use crate::error::{Error, Result};
