//! Bootstrap script appended to the shim on `/launcher.js`.

use bytes::{Bytes, BytesMut};

/// Script that instantiates the application's WebAssembly binary with the
/// `Go` class the shim defines, then runs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    script: String,
}

impl Bootstrap {
    /// Render the script for a binary served at `wasm_path`
    pub fn new(wasm_path: &str) -> Self {
        // A JSON string is a valid JavaScript string literal
        let url = serde_json::Value::from(wasm_path).to_string();
        let script = format!(
            r#"
//
// WebAssembly launcher
//
(() => {{
  const go = new Go();
  WebAssembly.instantiateStreaming(fetch({url}), go.importObject)
    .then((result) => {{
      go.run(result.instance)
        .then(() => console.log("go.run exited"))
        .catch((err) => console.error("go.run failed:", err));
    }})
    .catch((err) => console.error("instantiate failed:", err));
}})();
"#
        );
        Self { script }
    }

    /// Script text
    pub fn as_str(&self) -> &str {
        &self.script
    }

    /// Shim followed by this script
    pub fn append_to(&self, shim: &[u8]) -> Bytes {
        let mut body = BytesMut::with_capacity(shim.len() + self.script.len());
        body.extend_from_slice(shim);
        body.extend_from_slice(self.script.as_bytes());
        body.freeze()
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new("app.wasm")
    }
}
