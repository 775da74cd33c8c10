mod footer;
mod results_component;
mod table_view;

pub use results_component::ResultsComponent;
