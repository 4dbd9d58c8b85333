//! UI module - reusable rendering pieces shared by the list and detail views

pub mod components;
