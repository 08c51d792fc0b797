pub mod argument;
pub mod chat;
pub mod run;
pub mod ticket;
