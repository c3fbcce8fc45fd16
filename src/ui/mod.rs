//! UI module - reusable rendering pieces shared by the views

pub mod components;
pub mod panel;
