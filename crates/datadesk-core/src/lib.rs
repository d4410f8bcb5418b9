// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod export;
pub mod filter;
pub mod model;
pub mod samples;
pub mod select;
pub mod sort;
pub mod state;
pub mod summary;

pub use export::*;
pub use filter::*;
pub use model::*;
pub use select::*;
pub use sort::*;
pub use state::*;
pub use summary::*;
