use kiosk_admin_api_types::{ExitPasswordRequest, ExitPasswordStatus, SettingsUpdateRequest};

use super::non_blank;
use crate::{
    application::{console::AdminConsole, error::AdminError, ports::Notification},
    domain::{content::WEATHER_CITIES, error::DomainError},
    presentation::document::{Panel, PanelId},
};

/// Contents of the organisation settings form.
#[derive(Debug, Clone, Default)]
pub struct SettingsCommand {
    pub org_name: String,
    pub logo_path: Option<String>,
    /// Replaces the kiosk exit password when present.
    pub exit_password: Option<String>,
    pub show_weather: bool,
    pub weather_city: Option<String>,
}

impl SettingsCommand {
    fn into_request(self) -> Result<SettingsUpdateRequest, DomainError> {
        let weather_city = non_blank(self.weather_city);
        if let Some(city) = weather_city.as_deref().filter(|c| !WEATHER_CITIES.contains(c)) {
            return Err(DomainError::validation(format!(
                "weather is not available for `{city}`"
            )));
        }
        Ok(SettingsUpdateRequest {
            org_name: Some(self.org_name.trim().to_string()),
            logo_path: non_blank(self.logo_path),
            kiosk_exit_password: non_blank(self.exit_password),
            show_weather: Some(self.show_weather),
            weather_city: Some(weather_city.unwrap_or_default()),
        })
    }
}

impl AdminConsole {
    pub async fn save_settings(&self, command: SettingsCommand) -> Result<(), AdminError> {
        let request = match command.into_request() {
            Ok(request) => request,
            Err(err) => return self.reject(err),
        };
        let result = self.api().save_settings(&request).await;
        self.conclude("Save settings", Notification::success("Saved"), result)
            .await
    }

    /// Set the kiosk exit password; both entries must match.
    pub async fn set_exit_password(
        &self,
        password: &str,
        confirmation: &str,
    ) -> Result<ExitPasswordStatus, AdminError> {
        let password = password.trim();
        if password.is_empty() {
            return self.reject(DomainError::validation("enter a password"));
        }
        if password != confirmation.trim() {
            return self.reject(DomainError::validation("passwords do not match"));
        }
        self.send_exit_password(ExitPasswordRequest::set(password), "Saved")
            .await
    }

    pub async fn clear_exit_password(&self) -> Result<ExitPasswordStatus, AdminError> {
        self.send_exit_password(ExitPasswordRequest::clear(), "Password cleared")
            .await
    }

    async fn send_exit_password(
        &self,
        request: ExitPasswordRequest,
        title: &'static str,
    ) -> Result<ExitPasswordStatus, AdminError> {
        let status = match self.api().set_exit_password(&request).await {
            Ok(status) => status,
            Err(err) => return Err(self.report_failure("Exit password", err)),
        };
        self.update_document("exit_password.status", |document| {
            if let Some(Panel::Settings(form)) = document.panel_mut(PanelId::Settings) {
                form.exit_password_set = Some(status.exit_password_set);
            }
        });
        self.notify(Notification::success(title));
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_omitted_or_cleared() {
        let request = SettingsCommand {
            org_name: " Museum ".into(),
            exit_password: Some(" ".into()),
            weather_city: None,
            ..SettingsCommand::default()
        }
        .into_request()
        .expect("valid");
        assert_eq!(request.org_name.as_deref(), Some("Museum"));
        assert_eq!(request.kiosk_exit_password, None);
        assert_eq!(request.logo_path, None);
        assert_eq!(request.show_weather, Some(false));
        assert_eq!(request.weather_city.as_deref(), Some(""));
    }

    #[test]
    fn weather_city_must_be_supported() {
        let valid = SettingsCommand {
            show_weather: true,
            weather_city: Some("Grodno".into()),
            ..SettingsCommand::default()
        };
        assert_eq!(
            valid.into_request().expect("valid").weather_city.as_deref(),
            Some("Grodno")
        );

        let invalid = SettingsCommand {
            weather_city: Some("Paris".into()),
            ..SettingsCommand::default()
        };
        assert!(invalid.into_request().is_err());
    }
}
