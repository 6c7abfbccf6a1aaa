use askama::Template;
use latchkey_core::{ActivationToken, Email, Notifier, NotifierError};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use crate::config::prod;

const ACTIVATION_SUBJECT: &str = "Activate your account";
const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Template)]
#[template(path = "activation_email.html")]
struct ActivationEmailHtml<'a> {
    activation_link: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "activation_email.txt")]
struct ActivationEmailText<'a> {
    activation_link: &'a str,
    ttl_hours: i64,
}

/// Sends activation links through the Postmark HTTP API.
#[derive(Clone)]
pub struct PostmarkNotifier {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
    link_base_url: String,
    link_ttl_hours: i64,
}

impl PostmarkNotifier {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
            link_base_url: prod::activation::LINK_BASE_URL.to_owned(),
            link_ttl_hours: prod::activation::TTL_HOURS,
        }
    }

    /// Where activation links point and how long they stay valid, as stated
    /// in the message.
    pub fn with_activation_link(mut self, link_base_url: String, ttl_hours: i64) -> Self {
        self.link_base_url = link_base_url;
        self.link_ttl_hours = ttl_hours;
        self
    }

    fn activation_link(&self, token: &ActivationToken) -> Result<Url, NotifierError> {
        let mut link = Url::parse(&self.link_base_url)
            .map_err(|e| NotifierError(format!("invalid activation link base: {e}")))?;
        link.query_pairs_mut().append_pair("token", token.as_str());
        Ok(link)
    }
}

#[async_trait::async_trait]
impl Notifier for PostmarkNotifier {
    #[tracing::instrument(name = "Sending activation email", skip_all)]
    async fn send_activation(
        &self,
        destination: &Email,
        token: &ActivationToken,
    ) -> Result<(), NotifierError> {
        let base = Url::parse(&self.base_url).map_err(|e| NotifierError(e.to_string()))?;
        let url = base.join("/email").map_err(|e| NotifierError(e.to_string()))?;

        let link = self.activation_link(token)?;
        let html_body = ActivationEmailHtml {
            activation_link: link.as_str(),
            ttl_hours: self.link_ttl_hours,
        }
        .render()
        .map_err(|e| NotifierError(e.to_string()))?;
        let text_body = ActivationEmailText {
            activation_link: link.as_str(),
            ttl_hours: self.link_ttl_hours,
        }
        .render()
        .map_err(|e| NotifierError(e.to_string()))?;

        let request_body = SendEmailRequest {
            from: self.sender.as_ref().expose_secret(),
            to: destination.as_ref().expose_secret(),
            subject: ACTIVATION_SUBJECT,
            html_body: &html_body,
            text_body: &text_body,
            message_stream: MESSAGE_STREAM,
        };

        self.http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await
            .map_err(|e| NotifierError(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotifierError(e.to_string()))?;

        Ok(())
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}
