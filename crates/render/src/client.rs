//! Browser glue script.
//!
//! The generated script defines `LivePlot`, which opens the figure's
//! WebSocket, declares binary-frame support, forwards mouse input as
//! interaction events and paints incoming frames. The header constants are
//! generated from the engine configuration and the export format set.

use types::ExportFormat;

use crate::engine::EngineConfig;

/// Toolbar buttons offered to the browser: `(name, tooltip)`.
pub const TOOLBAR: [(&str, &str); 1] = [("home", "Reset original view")];

/// Generate the glue script.
pub fn script(config: &EngineConfig) -> String {
    let formats: Vec<String> = ExportFormat::ALL
        .iter()
        .map(|f| format!("\"{}\"", f.extension()))
        .collect();
    let toolbar: Vec<String> = TOOLBAR
        .iter()
        .map(|(name, tip)| format!("[\"{}\", \"{}\"]", name, tip))
        .collect();

    format!(
        "const LIVE_PLOT_DEFAULT_SIZE = [{}, {}];\n\
         const LIVE_PLOT_FORMATS = [{}];\n\
         const LIVE_PLOT_TOOLBAR = [{}];\n\
         {}",
        config.width,
        config.height,
        formats.join(", "),
        toolbar.join(", "),
        BODY
    )
}

const BODY: &str = r#"
class LivePlot {
  constructor(wsUri, sessionId, root) {
    this.sessionId = sessionId;
    this.root = root;
    this.image = root.querySelector("img.live-plot-canvas");
    this.status = root.querySelector(".live-plot-status");
    this.ws = new WebSocket(wsUri);
    this.ws.binaryType = "blob";
    this.ws.onopen = () => {
      this.send({ type: "supports_binary", value: typeof Blob !== "undefined" });
      this.send({ type: "refresh" });
    };
    this.ws.onmessage = (evt) => this.receive(evt.data);
    this.ws.onclose = () => this.setStatus("Connection closed");
    this.bindMouse();
    this.buildToolbar();
  }

  send(message) {
    if (this.ws.readyState === WebSocket.OPEN) {
      message.figure_id = this.sessionId;
      this.ws.send(JSON.stringify(message));
    }
  }

  receive(data) {
    if (typeof Blob !== "undefined" && data instanceof Blob) {
      const url = URL.createObjectURL(data);
      const previous = this.image.src;
      this.image.onload = () => {
        if (previous.startsWith("blob:")) URL.revokeObjectURL(previous);
      };
      this.image.src = url;
      this.send({ type: "ack" });
      return;
    }
    if (typeof data === "string" && data.startsWith("data:image/png;base64")) {
      this.image.src = data;
      this.send({ type: "ack" });
      return;
    }
    let msg;
    try {
      msg = JSON.parse(data);
    } catch (e) {
      return;
    }
    if (msg.type === "resize") {
      this.image.width = msg.size[0];
      this.image.height = msg.size[1];
    } else if (msg.type === "message") {
      this.setStatus(msg.message);
    }
  }

  setStatus(text) {
    if (this.status) this.status.textContent = text;
  }

  position(evt) {
    const rect = this.image.getBoundingClientRect();
    return { x: evt.clientX - rect.left, y: evt.clientY - rect.top };
  }

  bindMouse() {
    this.image.addEventListener("mousemove", (evt) =>
      this.send({ type: "motion_notify", ...this.position(evt) }));
    this.image.addEventListener("mousedown", (evt) => {
      evt.preventDefault();
      this.send({ type: "button_press", button: evt.button, ...this.position(evt) });
    });
    this.image.addEventListener("mouseup", (evt) =>
      this.send({ type: "button_release", button: evt.button, ...this.position(evt) }));
    this.image.addEventListener("wheel", (evt) => {
      evt.preventDefault();
      this.send({ type: "scroll", step: evt.deltaY < 0 ? 1 : -1, ...this.position(evt) });
    });
  }

  buildToolbar() {
    const bar = this.root.querySelector(".live-plot-toolbar");
    if (!bar) return;
    for (const [name, tooltip] of LIVE_PLOT_TOOLBAR) {
      const button = document.createElement("button");
      button.textContent = name;
      button.title = tooltip;
      button.onclick = () => this.send({ type: "toolbar_button", name });
      bar.appendChild(button);
    }
    const select = document.createElement("select");
    for (const ext of LIVE_PLOT_FORMATS) {
      const option = document.createElement("option");
      option.value = ext;
      option.textContent = ext;
      select.appendChild(option);
    }
    const download = document.createElement("button");
    download.textContent = "Download";
    download.onclick = () =>
      window.open("/" + this.sessionId + "/download." + select.value, "_blank");
    bar.appendChild(select);
    bar.appendChild(download);
  }

  resize(width, height) {
    this.send({ type: "resize", width, height });
  }
}
"#;
