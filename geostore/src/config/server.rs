use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to.
	#[serde(default)]
	pub ip: Option<String>,

	/// TCP port to bind to.
	#[serde(default)]
	pub port: Option<u16>,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip.clone_from(ip);
		}
	}

	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}

	#[must_use]
	pub fn ip_or_default(&self) -> &str {
		self.ip.as_deref().unwrap_or("0.0.0.0")
	}

	#[must_use]
	pub fn port_or_default(&self) -> u16 {
		self.port.unwrap_or(8080)
	}
}
