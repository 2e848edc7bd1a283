//! WebSocket-based live preview updates.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to preview clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Replace the preview with a newly extracted notebook
    UpdateContent {
        /// Book title, for the browser tab
        title: String,
        /// Author line, for `<meta name="author">`
        authors: String,
        /// New `<article>` fragment
        html: String,
    },

    /// The latest input could not be extracted; the previous preview stays
    Error {
        /// Human readable reason
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting live messages to all connected clients.
#[derive(Debug, Clone)]
pub struct LiveHub {
    sender: broadcast::Sender<LiveMessage>,
}

impl LiveHub {
    /// Create a new live hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: LiveMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to live messages.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side live preview script.
pub fn live_client_script(ws_url: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const ws = new WebSocket('{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  ws.onopen = function() {{
    console.log('[live] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'update_content':
        const main = document.querySelector('main');
        if (!main) {{
          location.reload();
          break;
        }}
        main.innerHTML = msg.html;
        document.title = msg.title;
        let authorMeta = document.querySelector('meta[name="author"]');
        if (!authorMeta) {{
          authorMeta = document.createElement('meta');
          authorMeta.name = 'author';
          document.head.appendChild(authorMeta);
        }}
        authorMeta.content = msg.authors;
        break;

      case 'error':
        console.error('[live] ' + msg.message);
        break;

      case 'connected':
        console.log('[live] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[live] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};
}})();
"#,
        ws_url
    )
}
