//! Client core for the FoodieGo marketplace.
//!
//! Customers browse a restaurant's menu into a single-restaurant cart and check
//! out; restaurant owners drive their orders through the fulfilment pipeline.
//!
//! The cart lives in a store actor ([`actor_framework::StoreActor`]) so every
//! screen shares one serialized view of it. Remote calls go through the traits in
//! [`api`], implemented over HTTP by [`clients::HttpApiClient`].

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod console;
pub mod domain;
pub mod session;
pub mod storefront;

#[cfg(test)]
mod mock_framework;
