//! Raw RFC 822 alert messages.

use super::SENDER;

/// Single-part `text/plain` alert.
pub fn plain(body: &str) -> Vec<u8> {
    format!(
        "From: TradingView <{SENDER}>\r\n\
         To: trader@icloud.com\r\n\
         Subject: Alert: strategy\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}\r\n"
    )
    .into_bytes()
}

/// `multipart/alternative` alert with a plain and an HTML part.
pub fn multipart(text: &str, html: &str) -> Vec<u8> {
    format!(
        "From: TradingView <{SENDER}>\r\n\
         Subject: Alert: strategy\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
         \r\n\
         --sep\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {text}\r\n\
         --sep\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         \r\n\
         {html}\r\n\
         --sep--\r\n"
    )
    .into_bytes()
}

/// HTML-only alert, which carries no readable text part.
pub fn html_only(html: &str) -> Vec<u8> {
    format!(
        "From: TradingView <{SENDER}>\r\n\
         Subject: Alert: strategy\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
         \r\n\
         --sep\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         \r\n\
         {html}\r\n\
         --sep--\r\n"
    )
    .into_bytes()
}
