pub mod csv;
pub mod results;

pub use csv::CsvConnector;
pub use results::ResultTable;
