//! [Groq]-backed [`Completion`] implementation.
//!
//! [Groq]: https://groq.com

use std::sync::LazyLock;

use derive_more::Debug;
use regex::Regex;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

use super::{
    Chat, Completion, Diagnose, Error, Question, ReviseSchedule, Role,
    SlotDraft,
};

/// Persona turn prepended to every [`Chat`] conversation.
const PERSONA: &str = "Tu es Athena, une assistante IA spécialisée dans \
    l'aide aux étudiants. Tu aides avec l'organisation, les révisions, la \
    compréhension de cours et la méthodologie de travail. Tu réponds \
    toujours en français, de manière concise et encourageante. Tu utilises \
    des techniques pédagogiques comme le rappel actif, la répétition \
    espacée et la méthode Pomodoro.";

/// Reply used when the model returns an empty [`Chat`] completion.
const EMPTY_REPLY: &str = "Désolée, je n'ai pas pu générer de réponse.";

/// [`Groq`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// API key authenticating requests.
    #[debug(skip)]
    pub api_key: SecretString,

    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Model to run completions on.
    pub model: String,
}

/// [`Completion`] implementation talking to the [Groq] API.
///
/// [Groq]: https://groq.com
#[derive(Clone, Debug)]
pub struct Groq {
    /// Configuration of this [`Groq`] client.
    config: Config,

    /// Underlying HTTP client.
    http: reqwest::Client,
}

impl Groq {
    /// Creates a new [`Groq`] client with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Runs a chat completion and returns the content of its first choice.
    ///
    /// An empty or missing content is returned as an empty string.
    async fn complete(
        &self,
        messages: Vec<WireMessage<'_>>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, Traced<Error>> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&Request {
                model: &self.config.model,
                messages,
                temperature,
                max_tokens,
            })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let mut response: Response = response
            .json()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        if response.choices.is_empty() {
            return Err(tracerr::new!(Error::NoChoices));
        }
        Ok(response
            .choices
            .swap_remove(0)
            .message
            .content
            .unwrap_or_default())
    }
}

impl Completion<Chat> for Groq {
    type Ok = String;
    type Err = Traced<Error>;

    async fn execute(&self, Chat(turns): Chat) -> Result<Self::Ok, Self::Err> {
        let mut messages = vec![WireMessage {
            role: "system",
            content: PERSONA.into(),
        }];
        messages.extend(turns.iter().map(|t| WireMessage {
            role: match t.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: t.content.as_str().into(),
        }));

        let reply = self.complete(messages, 0.7, 1024).await?;
        Ok(if reply.trim().is_empty() {
            EMPTY_REPLY.to_owned()
        } else {
            reply
        })
    }
}

impl Completion<ReviseSchedule> for Groq {
    type Ok = Vec<SlotDraft>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: ReviseSchedule,
    ) -> Result<Self::Ok, Self::Err> {
        use std::fmt::Write as _;

        let ReviseSchedule { blocks, subjects } = op;

        let mut prompt = String::from(
            "Analyse cet emploi du temps et génère des créneaux de révision \
             optimisés.\n\nEmploi du temps actuel:\n",
        );
        for b in &blocks {
            _ = writeln!(
                prompt,
                "- {}: Jour {}, {}-{}",
                b.title,
                u8::from(b.day_of_week),
                b.start_time,
                b.end_time,
            );
        }
        _ = write!(
            prompt,
            "\nMatières à réviser: {}\n\n\
             Génère des créneaux de révision en JSON avec ce format:\n\
             [{{\"subject\": \"...\", \"method\": \
             \"pomodoro|active-recall|spaced-repetition\", \"dayOfWeek\": \
             0-6, \"startTime\": \"HH:MM\", \"endTime\": \"HH:MM\"}}]\n\n\
             Règles:\n\
             - Ne pas chevaucher les cours existants\n\
             - Sessions de 25-50 min avec pauses\n\
             - Varier les méthodes\n\
             - Répartir équitablement les matières\n\
             - Préférer le matin pour les matières difficiles\n\n\
             Réponds UNIQUEMENT avec le JSON, sans texte autour.",
            subjects
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        );

        let text = self
            .complete(
                vec![WireMessage {
                    role: "user",
                    content: prompt.into(),
                }],
                0.3,
                2048,
            )
            .await?;

        Ok(parse_json_array(&text))
    }
}

impl Completion<Diagnose> for Groq {
    type Ok = Vec<Question>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Diagnose(subject): Diagnose,
    ) -> Result<Self::Ok, Self::Err> {
        let prompt = format!(
            "Génère 5 questions QCM de diagnostic pour évaluer le niveau \
             d'un étudiant en \"{subject}\".\n\n\
             Format JSON:\n\
             [{{\n\
             \x20 \"question\": \"...\",\n\
             \x20 \"options\": [\"A\", \"B\", \"C\", \"D\"],\n\
             \x20 \"correctAnswer\": 0,\n\
             \x20 \"explanation\": \"...\"\n\
             }}]\n\n\
             Les questions doivent couvrir différents niveaux de \
             difficulté.\n\
             Réponds UNIQUEMENT avec le JSON.",
        );

        let text = self
            .complete(
                vec![WireMessage {
                    role: "user",
                    content: prompt.into(),
                }],
                0.5,
                2048,
            )
            .await?;

        Ok(parse_json_array(&text))
    }
}

/// Extracts and parses the JSON array out of the model's `text`.
///
/// Models wrap JSON into prose or code fences despite instructions, so the
/// widest bracketed span is tried. Output failing to parse yields an empty
/// [`Vec`] rather than an error.
fn parse_json_array<T: serde::de::DeserializeOwned>(text: &str) -> Vec<T> {
    /// Regular expression matching the widest `[...]` span.
    static JSON_ARRAY: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

    JSON_ARRAY
        .find(text)
        .and_then(|m| {
            serde_json::from_str(m.as_str())
                .inspect_err(|e| {
                    tracing::warn!("malformed JSON in model output: {e}");
                })
                .ok()
        })
        .unwrap_or_default()
}

/// Request body of a chat completion.
#[derive(Debug, Serialize)]
struct Request<'r> {
    /// Model to run the completion on.
    model: &'r str,

    /// Conversation to complete.
    messages: Vec<WireMessage<'r>>,

    /// Sampling temperature.
    temperature: f32,

    /// Completion length cap, in tokens.
    max_tokens: u32,
}

/// Single message of a [`Request`] conversation.
#[derive(Debug, Serialize)]
struct WireMessage<'r> {
    /// Role of the message author.
    role: &'static str,

    /// Text of the message.
    content: std::borrow::Cow<'r, str>,
}

/// Response body of a chat completion.
#[derive(Debug, Deserialize)]
struct Response {
    /// Generated choices.
    choices: Vec<Choice>,
}

/// Single choice of a [`Response`].
#[derive(Debug, Deserialize)]
struct Choice {
    /// Generated message.
    message: ChoiceMessage,
}

/// Message of a [`Choice`].
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    /// Generated text, if any.
    content: Option<String>,
}

#[cfg(test)]
mod parse_json_array_spec {
    use super::{parse_json_array, SlotDraft};

    #[test]
    fn extracts_an_array_wrapped_in_prose() {
        let text = "Voici le plan:\n```json\n[{\"subject\": \"Maths\", \
                    \"method\": \"pomodoro\", \"dayOfWeek\": 1, \
                    \"startTime\": \"08:00\", \"endTime\": \"08:50\"}]\n```";
        let drafts: Vec<SlotDraft> = parse_json_array(text);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].subject, "Maths");
        assert_eq!(drafts[0].day_of_week, 1);
    }

    #[test]
    fn malformed_output_yields_an_empty_vec() {
        assert!(parse_json_array::<SlotDraft>("pas de JSON ici").is_empty());
        assert!(parse_json_array::<SlotDraft>("[{broken").is_empty());
        assert!(parse_json_array::<SlotDraft>("[{\"subject\": 42}]")
            .is_empty());
    }
}
