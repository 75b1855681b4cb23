use std::path::PathBuf;

use anyhow::{bail, Context};
use bidflow_rtd::Consent;

pub struct Config {
    pub rtd_config: PathBuf,
    pub log_format: String,
    pub consent: Option<Consent>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let rtd_config = var("BIDFLOW_RTD_CONFIG")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .context("BIDFLOW_RTD_CONFIG must point to the RTD configuration file")?;
        let log_format = var("BIDFLOW_LOG_FORMAT").unwrap_or_else(|| "text".into());

        let gdpr_applies = match var("BIDFLOW_GDPR_APPLIES").as_deref().map(str::trim) {
            None | Some("") => None,
            Some("1") | Some("true") => Some(true),
            Some("0") | Some("false") => Some(false),
            Some(other) => bail!("Invalid BIDFLOW_GDPR_APPLIES: {}", other),
        };
        let consent_string = var("BIDFLOW_CONSENT_STRING").filter(|s| !s.is_empty());

        let consent = if gdpr_applies.is_none() && consent_string.is_none() {
            None
        } else {
            Some(Consent {
                gdpr_applies,
                consent_string,
                us_privacy: None,
            })
        };

        Ok(Self {
            rtd_config,
            log_format,
            consent,
        })
    }
}
