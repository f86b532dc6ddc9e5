//! SocialPulse Core — shared data model, errors, configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DataPaths, PulseConfig};
pub use error::{Error, Result};
pub use types::{
    AnalysisRecord, ClassificationResult, Distribution, Engager, KeywordCount,
    LanguageBreakdown, LanguageBreakdowns, RemoteLanguage, RemoteNarrative, SamplePost,
    SentimentLabel, SocialDocument, Summary, Theme, TrendBucket, WordCountStats,
};
