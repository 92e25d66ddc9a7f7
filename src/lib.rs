// ABOUTME: Library crate for the API management admin console exposing the controllers,
// forms and API client for the apimctl binary, tests and embedding front ends

#![allow(missing_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod credentials;
pub mod forms;
pub mod i18n;
pub mod models;
pub mod notify;
