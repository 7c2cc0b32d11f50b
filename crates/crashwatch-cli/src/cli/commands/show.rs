//! `crashwatch show` - print the bundle with secrets masked.

use anyhow::Result;
use colored::Colorize;
use crashwatch_core::{CredentialBundle, Field};
use serde::Serialize;

use super::Context;
use crate::output::{describe_pem, mask_secret, print_structured, OutputFormat};

/// The bundle as it is safe to display.
#[derive(Debug, Serialize)]
struct MaskedBundle {
    source: String,
    thing_name: String,
    wifi_ssid: String,
    wifi_password: String,
    endpoint: String,
    root_ca: String,
    device_certificate: String,
    private_key: String,
}

impl MaskedBundle {
    fn new(source: String, bundle: &CredentialBundle) -> Self {
        Self {
            source,
            thing_name: bundle.thing_name().to_string(),
            wifi_ssid: bundle.wifi_ssid().to_string(),
            wifi_password: mask_secret(bundle.wifi_password()),
            endpoint: bundle.endpoint().to_string(),
            root_ca: describe_pem(bundle.root_ca()),
            device_certificate: describe_pem(bundle.device_certificate()),
            private_key: describe_pem(bundle.private_key()),
        }
    }

    fn get(&self, field: Field) -> &str {
        match field {
            Field::ThingName => &self.thing_name,
            Field::WifiSsid => &self.wifi_ssid,
            Field::WifiPassword => &self.wifi_password,
            Field::Endpoint => &self.endpoint,
            Field::RootCa => &self.root_ca,
            Field::DeviceCertificate => &self.device_certificate,
            Field::PrivateKey => &self.private_key,
        }
    }
}

pub async fn execute(ctx: Context) -> Result<()> {
    let bundle = ctx.source.load().await?;
    let masked = MaskedBundle::new(ctx.source.to_string(), &bundle);

    if ctx.output_format != OutputFormat::Pretty {
        return print_structured(ctx.output_format, &masked);
    }

    println!("{} {}", "Bundle:".bold(), masked.source.dimmed());
    println!();
    for field in Field::ALL {
        let value = masked.get(field);
        let shown = if value.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            value.to_string()
        };
        println!("  {:<20} {}", format!("{field}:").bold(), shown);
    }
    Ok(())
}
