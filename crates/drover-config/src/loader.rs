use std::path::Path;

use http::{HeaderName, HeaderValue};

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, variable expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if variable expansion, parsing, or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_endpoint()?;
        self.validate_headers()?;
        self.validate_model_settings()?;
        Ok(())
    }

    /// Base URL must be an HTTP(S) endpoint
    fn validate_endpoint(&self) -> anyhow::Result<()> {
        if let Some(ref url) = self.ollama.base_url
            && !matches!(url.scheme(), "http" | "https")
        {
            anyhow::bail!("ollama.base_url must use http or https, got '{}'", url.scheme());
        }

        Ok(())
    }

    /// Every configured header must be sendable
    fn validate_headers(&self) -> anyhow::Result<()> {
        for (name, value) in &self.ollama.headers {
            HeaderName::try_from(name.as_str()).map_err(|e| anyhow::anyhow!("invalid header name '{name}': {e}"))?;
            HeaderValue::try_from(value.as_str())
                .map_err(|e| anyhow::anyhow!("invalid value for header '{name}': {e}"))?;
        }

        Ok(())
    }

    fn validate_model_settings(&self) -> anyhow::Result<()> {
        if let Some(mirostat) = self.ollama.chat.settings.mirostat
            && mirostat > 2
        {
            anyhow::bail!("ollama.chat.settings.mirostat must be 0, 1, or 2, got {mirostat}");
        }

        if self.ollama.chat.model.trim().is_empty() {
            anyhow::bail!("ollama.chat.model must not be empty");
        }

        if self.ollama.embedding.settings.max_embeddings_per_call == Some(0) {
            anyhow::bail!("ollama.embedding.settings.max_embeddings_per_call must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{Config, LogFormat};

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert!(config.ollama.base_url.is_none());
        assert!(config.ollama.headers.is_empty());
        assert_eq!(config.ollama.chat.model, "llama3.2");
        assert_eq!(config.ollama.embedding.model, "nomic-embed-text");
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn full_document_parses() {
        let raw = r#"
            [logging]
            filter = "debug"
            format = "json"

            [ollama]
            base_url = "http://gpu-box:11434/api"

            [ollama.headers]
            x-team = "research"

            [ollama.chat]
            model = "mistral"

            [ollama.chat.settings]
            mirostat = 2
            mirostat_tau = 4.5
            num_ctx = 8192
            stop = ["</answer>"]
            top_k = 30

            [ollama.embedding.settings]
            max_embeddings_per_call = 16
            truncate = true
        "#;

        let config = Config::from_toml_str(raw).unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.ollama.base_url.unwrap().as_str(), "http://gpu-box:11434/api");
        assert_eq!(config.ollama.headers["x-team"], "research");
        assert_eq!(config.ollama.chat.model, "mistral");
        assert_eq!(config.ollama.chat.settings.mirostat, Some(2));
        assert_eq!(config.ollama.chat.settings.num_ctx, Some(8192));
        assert_eq!(config.ollama.chat.settings.stop, Some(vec!["</answer>".to_owned()]));
        assert_eq!(config.ollama.embedding.settings.max_embeddings_per_call, Some(16));
    }

    #[test]
    fn unknown_setting_is_rejected() {
        let err = Config::from_toml_str("[ollama.chat.settings]\ntemperature_x = 1.0").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = Config::from_toml_str("[ollama]\nbase_url = \"ftp://localhost/api\"").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let err = Config::from_toml_str("[ollama.headers]\n\"bad header\" = \"x\"").unwrap_err();
        assert!(err.to_string().contains("invalid header name"));
    }

    #[test]
    fn out_of_range_mirostat_is_rejected() {
        let err = Config::from_toml_str("[ollama.chat.settings]\nmirostat = 3").unwrap_err();
        assert!(err.to_string().contains("mirostat"));
    }

    #[test]
    fn zero_embedding_batch_is_rejected() {
        let err = Config::from_toml_str("[ollama.embedding.settings]\nmax_embeddings_per_call = 0").unwrap_err();
        assert!(err.to_string().contains("max_embeddings_per_call"));
    }

    #[test]
    fn load_expands_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ollama.chat]\nmodel = \"{{{{ env.DROVER_TEST_MODEL }}}}\"").unwrap();

        temp_env::with_var("DROVER_TEST_MODEL", Some("qwen2.5"), || {
            let config = Config::load(file.path()).unwrap();
            assert_eq!(config.ollama.chat.model, "qwen2.5");
        });
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/drover.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
