//! # Commands
//!
//! Everything the UI shell can invoke. Each command takes only the state it
//! needs and returns `Result<T, ApiError>`.
//!
//! | Module      | Commands                                                         |
//! |-------------|------------------------------------------------------------------|
//! | [`tour`]    | list_active_tours, get_tour, save_tour, deactivate_tour          |
//! | [`cart`]    | get_cart, add_to_cart, update_cart_quantity, remove_from_cart, clear_cart |
//! | [`sale`]    | record_sale                                                      |
//! | [`summary`] | today_summary, sales_for_date                                    |
//! | [`closing`] | closing_status, close_today, close_day                           |
//! | [`history`] | list_closings, get_closing, closing_detail                       |
//!
//! Reads degrade to empty results when no database is configured. Writes
//! check the session and the database before touching anything.

pub mod cart;
pub mod closing;
pub mod history;
pub mod sale;
pub mod summary;
pub mod tour;
