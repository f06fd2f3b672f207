//! Security Primitives Module
//!
//! - Scrubbing of kernel memory that held user data
//!
//! # Security Properties
//! - Memory is cleared using volatile writes to prevent optimization

pub mod zeroize;

pub use zeroize::Zeroize;
