//! # Scoring Service Client
//!
//! HTTP client for the external risk-scoring service, plus the assembled
//! high-level operations a host authentication flow calls: publish a login
//! event, evaluate its account-takeover risk score, or fetch the workflow
//! decision for the session.
//!
//! Payload construction and configuration resolution live in the companion
//! `sentria-fraud` crate.
//!
//! ## Example
//!
//! ```ignore
//! use sentria_fraud::prelude::*;
//! use sentria_fraud_client::{ClientConfig, FraudDetectionService, FraudScoreClient};
//!
//! let client = FraudScoreClient::new(ClientConfig::new("https://api.example.com/v1/events"))?;
//! let service = FraudDetectionService::new(store, client);
//!
//! let score = service
//!     .login_risk_score(&event, "LOGIN_SUCCESS", None, None)
//!     .await?;
//! if score > 0.8 {
//!     // step up authentication
//! }
//! ```

pub mod client;
pub mod config;
pub mod response;
pub mod service;

// Re-exports
pub use client::{FraudScoreClient, MAX_RISK_SCORE};
pub use config::ClientConfig;
pub use response::{
    EventResponse, ScoreResponse, WorkflowStatus, ABUSE_TYPE_ACCOUNT_TAKEOVER,
    ENTITY_TYPE_SESSION, HISTORY_APP_DECISION, STATUS_OK,
};
pub use service::FraudDetectionService;
