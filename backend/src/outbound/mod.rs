//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! The only driven infrastructure in this system is the relational store;
//! its Diesel adapters live under [`persistence`].

pub mod persistence;
