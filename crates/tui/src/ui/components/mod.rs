//! UI components: the results view and the widgets it is built from.

pub mod common;
pub mod component;
pub mod results;

pub use results::ResultsComponent;
