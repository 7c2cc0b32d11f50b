//! Export a bundle as the Arduino `secrets.h` header the ESP32 firmware
//! compiles in.

use std::fmt::Write;

use crate::bundle::CredentialBundle;
use crate::error::{CredentialError, Result};
use crate::field::Field;

/// Render the firmware header for `bundle`.
///
/// Plain values become escaped C string literals. PEM blobs are emitted as
/// C++11 raw strings stored in flash (`PROGMEM`).
///
/// # Errors
///
/// Returns `HeaderEncoding` when a PEM blob contains its own raw-string
/// terminator.
pub fn render_header(bundle: &CredentialBundle) -> Result<String> {
    let mut out = String::new();
    out.push_str("#include <pgmspace.h>\n\n");
    out.push_str("#define SECRET\n");
    let _ = writeln!(out, "#define THINGNAME {}", c_string(bundle.thing_name()));
    out.push('\n');
    let _ = writeln!(out, "const char WIFI_SSID[] = {};", c_string(bundle.wifi_ssid()));
    let _ = writeln!(
        out,
        "const char WIFI_PASSWORD[] = {};",
        c_string(bundle.wifi_password())
    );
    let _ = writeln!(
        out,
        "const char AWS_IOT_ENDPOINT[] = {};",
        c_string(bundle.endpoint())
    );

    let blobs = [
        ("Amazon Root CA 1", "AWS_CERT_CA", "EOF", Field::RootCa),
        ("Device Certificate", "AWS_CERT_CRT", "KEY", Field::DeviceCertificate),
        ("Device Private Key", "AWS_CERT_PRIVATE", "KEY", Field::PrivateKey),
    ];
    for (comment, name, delimiter, field) in blobs {
        let body = bundle.get(field).trim();
        if body.contains(&format!("){delimiter}\"")) {
            return Err(CredentialError::HeaderEncoding { field });
        }
        let _ = write!(
            out,
            "\n// {comment}\nstatic const char {name}[] PROGMEM = R\"{delimiter}(\n{body}\n){delimiter}\";\n"
        );
    }

    Ok(out)
}

/// Quote `value` as a C string literal.
fn c_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for byte in value.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            // Octal escapes stop after three digits, unlike \x
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out.push('"');
    out
}
