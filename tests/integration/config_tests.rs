//! Configuration loading

#[cfg(test)]
mod tests {
    use predictive_alerts::config::{ChannelMode, Config, LogFormat, ReportMode};
    use predictive_alerts::core::models::ChannelKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENGINE_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9100
storage:
  database:
    url: "sqlite::memory:"
    max_connections: 1
logging:
  level: debug
  format: json
alerting:
  probability_floor: 0.7
  dedup_window_minutes: 30
notifications:
  max_attempts: 3
  email:
    mode: relay
    relay_url: "http://mail-relay.local/send"
    recipients: ["ops@plant.example"]
scheduler:
  escalation_tiers:
    - { name: "10m", after_minutes: 10 }
    - { name: "2h", after_minutes: 120 }
  escalation_channel: sms
  daily_report_time: "07:30"
  report:
    mode: webhook
    url: "http://reports.local/daily"
"#;

    #[tokio::test]
    async fn test_engine_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ENGINE_YAML.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        let engine = &config.engine;
        assert_eq!(engine.server.address(), "127.0.0.1:9100");
        assert_eq!(engine.logging.format, LogFormat::Json);
        assert_eq!(engine.alerting.dedup_window_minutes, 30);
        assert_eq!(engine.notifications.max_attempts, 3);
        assert_eq!(engine.notifications.email.mode, ChannelMode::Relay);
        assert_eq!(engine.notifications.sms.mode, ChannelMode::Log);
        assert_eq!(engine.scheduler.escalation_tiers.len(), 2);
        assert_eq!(engine.scheduler.escalation_channel, ChannelKind::Sms);
        assert_eq!(engine.scheduler.report.mode, ReportMode::Webhook);
        // Unset sections keep their defaults
        assert_eq!(engine.scheduler.retention_days, 90);
        assert_eq!(engine.maintenance.critical_days, 7);
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"alerting:\n  probability_floor: 1.5\n").unwrap();
        assert!(Config::from_file(file.path()).await.is_err());

        assert!(Config::from_file("/nonexistent/engine.yaml").await.is_err());
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut engine = Config::parse_yaml(ENGINE_YAML).unwrap();
        engine
            .apply_env_overrides([
                ("ENGINE_PORT", "9200"),
                ("DEDUP_WINDOW_MINUTES", "45"),
                ("LOG_FORMAT", "text"),
                ("UNRELATED", "ignored"),
            ])
            .unwrap();
        assert_eq!(engine.server.port, 9200);
        assert_eq!(engine.alerting.dedup_window_minutes, 45);
        assert_eq!(engine.logging.format, LogFormat::Text);

        let mut engine = Config::parse_yaml(ENGINE_YAML).unwrap();
        assert!(engine.apply_env_overrides([("ENGINE_PORT", "http")]).is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let parsed = Config::parse_yaml(&yaml).unwrap();
        assert_eq!(parsed.alerting.dedup_window_minutes, 60);
        assert_eq!(parsed.notifications.base_backoff_seconds, 30);
    }
}
