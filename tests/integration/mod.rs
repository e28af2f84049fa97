//! Integration Tests Module
//!
//! HTTP-level tests for the CCA allocation service. Every test drives the
//! real router over an in-memory database.

// Shared fixtures and request helpers
mod support;

// Current phase endpoint and fail-closed behavior
mod phase_api_test;

// Applicant and chair ranking endpoints
mod ranking_api_test;

// Sports/culture applications and member management
mod membership_api_test;

// Directory search and the user's own CCAs
mod user_api_test;
