use secrecy::{ExposeSecret, SecretBox};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid API key format for {service}: {reason}")]
    InvalidKeyFormat { service: String, reason: String },
    #[error("Environment error: {0}")]
    EnvError(#[from] env::VarError),
}

const DEFAULT_WATSONX_URL: &str = "https://us-south.ml.cloud.ibm.com";
const DEFAULT_DETECTOR_URL: &str = "http://127.0.0.1:8080/v1/detect";

/// Configuration for API services. Keys live in the environment (or a .env
/// file in development), never in source.
#[derive(Debug)]
pub struct ApiConfig {
    pub watsonx_key: SecretBox<String>,
    pub groq_key: SecretBox<String>,
    pub elevenlabs_key: SecretBox<String>,
    pub watsonx_project_id: String,
    pub watsonx_url: String,
    pub detector_url: String,
}

impl ApiConfig {
    /// Load API configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (for development)
        dotenvy::dotenv().ok(); // Don't error if .env doesn't exist

        let watsonx_key = Self::load_api_key("WATSONX_API_KEY", "watsonx")?;
        let groq_key = Self::load_api_key("GROQ_API_KEY", "Groq")?;
        let elevenlabs_key = Self::load_api_key("ELEVENLABS_API_KEY", "ElevenLabs")?;

        let watsonx_project_id = env::var("WATSONX_PROJECT_ID")
            .map_err(|_| ConfigError::MissingEnvVar("WATSONX_PROJECT_ID".to_string()))?;

        let watsonx_url =
            env::var("WATSONX_URL").unwrap_or_else(|_| DEFAULT_WATSONX_URL.to_string());
        let detector_url =
            env::var("DETECTOR_URL").unwrap_or_else(|_| DEFAULT_DETECTOR_URL.to_string());

        Ok(Self {
            watsonx_key,
            groq_key,
            elevenlabs_key,
            watsonx_project_id,
            watsonx_url,
            detector_url,
        })
    }

    /// Load and validate a single API key from environment
    fn load_api_key(env_var: &str, service_name: &str) -> Result<SecretBox<String>, ConfigError> {
        let key = env::var(env_var).map_err(|_| ConfigError::MissingEnvVar(env_var.to_string()))?;

        if key.trim().is_empty() {
            return Err(ConfigError::InvalidKeyFormat {
                service: service_name.to_string(),
                reason: "API key cannot be empty".to_string(),
            });
        }

        Self::validate_key_format(&key, service_name)?;

        Ok(SecretBox::new(Box::new(key)))
    }

    /// Validate API key format for each service
    fn validate_key_format(key: &str, service: &str) -> Result<(), ConfigError> {
        match service {
            "Groq" => {
                // Groq keys typically start with "gsk_"
                if !key.starts_with("gsk_") {
                    return Err(ConfigError::InvalidKeyFormat {
                        service: service.to_string(),
                        reason: "Groq keys should start with 'gsk_'".to_string(),
                    });
                }
            }
            "ElevenLabs" => {
                // ElevenLabs keys are typically hex strings
                if key.len() < 10 {
                    return Err(ConfigError::InvalidKeyFormat {
                        service: service.to_string(),
                        reason: "ElevenLabs keys should be at least 10 characters".to_string(),
                    });
                }
            }
            _ => {} // No fixed format for IAM bearer tokens
        }
        Ok(())
    }

    /// Get watsonx bearer token (use only when making API calls)
    pub fn watsonx_key(&self) -> &str {
        self.watsonx_key.expose_secret()
    }

    /// Get Groq API key (use only when making API calls)
    pub fn groq_key(&self) -> &str {
        self.groq_key.expose_secret()
    }

    /// Get ElevenLabs API key (use only when making API calls)
    pub fn elevenlabs_key(&self) -> &str {
        self.elevenlabs_key.expose_secret()
    }
}

/// Load configuration with helpful error messages for development
pub fn load_config() -> Result<ApiConfig, ConfigError> {
    match ApiConfig::load() {
        Ok(config) => {
            log::info!("Successfully loaded API configuration");
            Ok(config)
        }
        Err(ConfigError::MissingEnvVar(var)) => {
            log::error!("Missing required environment variable: {}", var);
            log::error!("Create a .env file in the project root with:");
            log::error!("{}=your_value_here", var);
            Err(ConfigError::MissingEnvVar(var))
        }
        Err(e) => {
            log::error!("Configuration error: {}", e);
            Err(e)
        }
    }
}
