//! # Recipe Roulette Telegram Bot
//!
//! A Telegram bot that lets a user browse TheMealDB by category, draws a
//! random sample of recipes and shows one of them translated.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod errors;
pub mod localization;
pub mod recipe;
pub mod session;
pub mod translation;
