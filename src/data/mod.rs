pub mod document;
pub mod export;
pub mod history;
pub mod points;
pub mod prefixes;
pub mod selection;
