//! Loader options.

use crate::error::TransformError;
use crate::loader::LoaderContext;
use crate::node::is_valid_identifier;
use serde::{Deserialize, Serialize};

/// User-facing loader options, as found in a bundler configuration.
///
/// Every field is optional in the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderOptions {
    /// Build for production: no `__file`, content-derived scope hashes, no hot reload.
    pub production: bool,
    /// Name of the class decorator to look for.
    pub decorator_name: String,
    /// Name of the decorator property holding the template.
    pub template_parameter_name: String,
    /// Name of the decorator property holding the styles.
    pub styles_parameter_name: String,
    /// Append hot-reload glue code in development builds.
    pub hot_reload: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            production: false,
            decorator_name: "Component".to_string(),
            template_parameter_name: "template".to_string(),
            styles_parameter_name: "styles".to_string(),
            hot_reload: true,
        }
    }
}

impl LoaderOptions {
    /// Checks that the configured names can actually match source code.
    pub fn validate(&self) -> Result<(), TransformError> {
        if !is_valid_identifier(&self.decorator_name) {
            return Err(TransformError::InvalidOptions(format!(
                "decoratorName must be an identifier, got {:?}",
                self.decorator_name
            )));
        }
        for (option, value) in [
            ("templateParameterName", &self.template_parameter_name),
            ("stylesParameterName", &self.styles_parameter_name),
        ] {
            if value.is_empty() {
                return Err(TransformError::InvalidOptions(format!(
                    "{option} must not be empty"
                )));
            }
        }
        if self.template_parameter_name == self.styles_parameter_name {
            return Err(TransformError::InvalidOptions(format!(
                "templateParameterName and stylesParameterName are both {:?}",
                self.template_parameter_name
            )));
        }
        Ok(())
    }
}

/// Options and build context resolved for one file.
#[derive(Debug, Clone)]
pub(crate) struct BuildSettings {
    pub production: bool,
    pub server: bool,
    pub hot_reload: bool,
    pub short_path: String,
    pub decorator_name: String,
    pub template_param: String,
    pub styles_param: String,
}

impl BuildSettings {
    pub fn resolve(ctx: &LoaderContext, options: &LoaderOptions) -> Self {
        Self {
            production: options.production || ctx.minimize,
            server: ctx.is_server_target(),
            hot_reload: options.hot_reload,
            short_path: ctx.short_path(),
            decorator_name: options.decorator_name.clone(),
            template_param: options.template_parameter_name.clone(),
            styles_param: options.styles_parameter_name.clone(),
        }
    }

    /// Whether hot-reload glue is appended to the output.
    pub fn emits_hot_reload(&self) -> bool {
        self.hot_reload && !self.server && !self.production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoaderOptions::default();
        assert!(!options.production);
        assert!(options.hot_reload);
        assert_eq!(options.decorator_name, "Component");
        assert_eq!(options.template_parameter_name, "template");
        assert_eq!(options.styles_parameter_name, "styles");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let options: LoaderOptions =
            serde_json::from_str(r#"{ "decoratorName": "View", "hotReload": false }"#).unwrap();
        assert_eq!(options.decorator_name, "View");
        assert!(!options.hot_reload);
        assert_eq!(options.styles_parameter_name, "styles");
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        let options = LoaderOptions {
            decorator_name: "not an ident".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(TransformError::InvalidOptions(_))
        ));

        let options = LoaderOptions {
            styles_parameter_name: "template".to_string(),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_settings_production_from_minimize() {
        let mut ctx = LoaderContext::new("/app/src/A.ts");
        ctx.minimize = true;
        let settings = BuildSettings::resolve(&ctx, &LoaderOptions::default());
        assert!(settings.production);
        assert!(!settings.emits_hot_reload());
    }

    #[test]
    fn test_settings_server_disables_hot_reload() {
        let mut ctx = LoaderContext::new("/app/src/A.ts");
        ctx.target = Some("node".to_string());
        let settings = BuildSettings::resolve(&ctx, &LoaderOptions::default());
        assert!(settings.server);
        assert!(!settings.emits_hot_reload());
    }
}
