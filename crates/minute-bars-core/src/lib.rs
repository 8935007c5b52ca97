pub mod bar;
pub mod error;
pub mod export;
pub mod repair;
pub mod request;
pub mod trading_calendar;
