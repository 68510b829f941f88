use crate::commands::{CmdMessage, CmdResult};
use crate::config::DocstashConfig;
use crate::error::{DocstashError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = DocstashConfig::load(data_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = DocstashConfig::load(data_dir)?;
            match config.get(&key) {
                Some(val) => {
                    let mut result = CmdResult::default();
                    result.add_message(CmdMessage::info(val));
                    Ok(result)
                }
                None => Err(DocstashError::Validation(format!(
                    "Unknown config key: {}",
                    key
                ))),
            }
        }
        ConfigAction::Set(key, value) => {
            let mut config = DocstashConfig::load(data_dir)?;
            config.set(&key, &value)?;
            config.save(data_dir)?;

            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TagDeletePolicy;

    #[test]
    fn set_persists_and_show_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        run(
            dir.path(),
            ConfigAction::Set("tag-delete".into(), "cascade".into()),
        )
        .unwrap();

        let shown = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(shown.config.unwrap().tag_delete, TagDeletePolicy::Cascade);

        let key = run(dir.path(), ConfigAction::ShowKey("tag_delete".into())).unwrap();
        assert_eq!(key.messages[0].content, "cascade");
    }

    #[test]
    fn unknown_key_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), ConfigAction::ShowKey("colour".into())).is_err());
        assert!(run(dir.path(), ConfigAction::Set("colour".into(), "red".into())).is_err());
    }

    #[test]
    fn bad_value_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            dir.path(),
            ConfigAction::Set("default_sort".into(), "random".into()),
        )
        .unwrap_err();
        assert!(matches!(err, DocstashError::Validation(_)));
        assert!(!dir.path().join("config.json").exists());
    }
}
