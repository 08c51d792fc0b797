pub mod agent;
pub mod ticket;
