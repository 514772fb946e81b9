pub mod auth;
pub mod cli;
pub mod csv_reader;
pub mod github;
pub mod ledger;
pub mod output;
pub mod paper;
pub mod run;
