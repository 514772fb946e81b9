pub mod issues;
pub mod pull;
pub mod push;
