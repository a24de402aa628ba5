use std::path::Path;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// A config deserializable from a YAML file
pub trait ReadableConfig: serde::de::DeserializeOwned {
    /// Read the config file from the given path
    fn read(path: &Path) -> impl std::future::Future<Output = anyhow::Result<Self>> + Send
    where
        Self: Sized;
}

impl<T> ReadableConfig for T
where
    T: serde::de::DeserializeOwned,
{
    /// Read the config file from the given path
    async fn read(path: &Path) -> anyhow::Result<T> {
        let mut buf = Vec::new();

        File::open(path)
            .await
            .with_context(|| format!("Failed to open config file {}", path.display()))?
            .read_to_end(&mut buf)
            .await
            .context("Failed to read config file")?;

        let ext = path.extension().and_then(|ext| ext.to_str());

        // Parse according to the extension
        match ext {
            Some("yml") | Some("yaml") => {
                let value: serde_yaml::Value =
                    serde_yaml::from_slice(&buf).context("Failed to parse config file as YAML")?;

                serde_yaml::from_value(value).context("Error parsing config file")
            }
            _ => {
                let value: serde_json::Value =
                    serde_json::from_slice(&buf).context("Failed to parse config file as JSON")?;

                serde_json::from_value(value).context("Error parsing config file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::ReadableConfig;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        domain_id: u32,
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[tokio::test]
    async fn test_read_yaml_by_extension() {
        let file = write_temp(".yaml", "name: sealevel\ndomain_id: 1337\n");
        let sample = Sample::read(file.path()).await.unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "sealevel".to_string(),
                domain_id: 1337
            }
        );
    }

    #[tokio::test]
    async fn test_read_json_fallback() {
        let file = write_temp(".json", r#"{"name": "sovereign"}"#);
        let sample = Sample::read(file.path()).await.unwrap();
        assert_eq!(sample.name, "sovereign");
        assert_eq!(sample.domain_id, 0);
    }

    #[tokio::test]
    async fn test_yaml_contents_in_json_file_fail() {
        let file = write_temp(".json", "name: sealevel\n");
        let err = Sample::read(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("as JSON"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = Sample::read(std::path::Path::new("/nonexistent/hyperwarp.yaml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open config file"));
    }
}
