//! TutorLink - Tutoring Support Platform
//!
//! This crate implements the backend for a tutoring platform: students,
//! tutors, and admins manage consulting sessions, pairing requests,
//! messaging, feedback, notifications, and shared resources through a
//! REST API polled by a single-page frontend.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
