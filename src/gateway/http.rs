//! reqwest-backed implementation of [`SessionGateway`].

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{PlayerId, Question, SessionCode, SessionStatus};
use crate::protocol::{
    CreateSessionRequest, CreateSessionResponse, ErrorBody, GenerateQuizRequest,
    JoinSessionRequest, JoinSessionResponse, ResultsResponse, SessionStatusResponse,
    SubmitAnswerRequest, SubmitAnswerResponse, WireQuestion, resolve_traits,
};

use super::{GatewayError, QuizContentError, RequestError, SessionGateway};

/// Upper bound on an answer submission. The player is looking at the
/// feedback screen until it returns.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Talks to the quiz backend over HTTP/JSON.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    submit_timeout: Duration,
}

impl HttpGateway {
    /// Build a gateway rooted at `base_url`. Every request is bounded by
    /// `timeout`; answer submissions by the smaller of it and [`SUBMIT_TIMEOUT`].
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            submit_timeout: timeout.min(SUBMIT_TIMEOUT),
        })
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn submit_timeout(&self) -> Duration {
        self.submit_timeout
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.endpoint(segments)).json(body);
        self.exchange(display_path(segments), request).await
    }

    async fn get<T>(&self, segments: &[&str]) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.endpoint(segments));
        self.exchange(display_path(segments), request).await
    }

    async fn exchange<T>(&self, path: String, request: RequestBuilder) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        debug!(%path, "sending request");

        let response = request
            .send()
            .await
            .map_err(|source| RequestError::Send {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            // The backend explains most rejections as `{"error": "..."}`.
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            warn!(%path, %status, %message, "backend rejected request");
            return Err(RequestError::Status {
                path,
                status,
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| RequestError::Decode { path, source })
    }

    async fn quiz(
        &self,
        segments: &[&str],
        request: Option<&GenerateQuizRequest>,
    ) -> Result<Vec<Question>, RequestError> {
        let wire: Vec<WireQuestion> = match request {
            Some(body) => self.post(segments, body).await?,
            None => self.get(segments).await?,
        };
        into_questions(display_path(segments), wire)
    }
}

fn display_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

fn into_questions(path: String, wire: Vec<WireQuestion>) -> Result<Vec<Question>, RequestError> {
    if wire.is_empty() {
        return Err(RequestError::InvalidQuiz {
            path,
            source: QuizContentError::Empty,
        });
    }

    wire.into_iter()
        .enumerate()
        .map(|(index, question)| {
            Question::try_from(question).map_err(|source| RequestError::InvalidQuiz {
                path: path.clone(),
                source: QuizContentError::Question { index, source },
            })
        })
        .collect()
}

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn create_session(&self, max_players: u8) -> Result<SessionCode, GatewayError> {
        let reply: CreateSessionResponse = self
            .post(&["create-session"], &CreateSessionRequest { max_players })
            .await
            .map_err(GatewayError::SessionCreateFailed)?;
        Ok(reply.session_code)
    }

    async fn join_session(
        &self,
        name: &str,
        code: &SessionCode,
    ) -> Result<PlayerId, GatewayError> {
        let body = JoinSessionRequest {
            name: name.to_string(),
            session_code: code.clone(),
        };
        let reply: JoinSessionResponse = self
            .post(&["join-session"], &body)
            .await
            .map_err(|source| GatewayError::JoinFailed {
                code: code.clone(),
                source,
            })?;
        Ok(reply.player_id)
    }

    async fn generate_quiz(&self, topic: &str) -> Result<Vec<Question>, GatewayError> {
        let body = GenerateQuizRequest {
            topic: topic.to_string(),
        };
        self.quiz(&["generate-quiz"], Some(&body))
            .await
            .map_err(|source| GatewayError::QuizGenerationFailed {
                topic: topic.to_string(),
                source,
            })
    }

    async fn fetch_quiz(&self, code: &SessionCode) -> Result<Vec<Question>, GatewayError> {
        self.quiz(&["get-quiz", code.as_str()], None)
            .await
            .map_err(|source| GatewayError::QuizFetchFailed {
                code: code.clone(),
                source,
            })
    }

    async fn submit_answer(
        &self,
        player: &PlayerId,
        answer: Option<String>,
    ) -> Result<(), GatewayError> {
        let body = SubmitAnswerRequest {
            player_id: player.clone(),
            answer,
        };
        let segments = ["submit-answer"];
        let request = self
            .client
            .post(self.endpoint(&segments))
            .json(&body)
            .timeout(self.submit_timeout);
        let _ack: SubmitAnswerResponse = self
            .exchange(display_path(&segments), request)
            .await
            .map_err(GatewayError::SubmissionFailed)?;
        Ok(())
    }

    async fn fetch_results(
        &self,
        code: &SessionCode,
    ) -> Result<IndexMap<String, String>, GatewayError> {
        let raw: ResultsResponse = self
            .get(&["results", code.as_str()])
            .await
            .map_err(|source| GatewayError::ResultsFetchFailed {
                code: code.clone(),
                source,
            })?;
        Ok(resolve_traits(raw))
    }

    async fn fetch_session_status(
        &self,
        code: &SessionCode,
    ) -> Result<SessionStatus, GatewayError> {
        let reply: SessionStatusResponse = self
            .get(&["session-status", code.as_str()])
            .await
            .map_err(|source| GatewayError::StatusFetchFailed {
                code: code.clone(),
                source,
            })?;
        Ok(reply.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let root = gateway("http://localhost:5000");
        assert_eq!(
            root.endpoint(&["results", "ABC123"]).as_str(),
            "http://localhost:5000/results/ABC123"
        );

        let nested = gateway("http://quiz.local/api/");
        assert_eq!(
            nested.endpoint(&["create-session"]).as_str(),
            "http://quiz.local/api/create-session"
        );
    }

    #[test]
    fn test_submissions_get_the_shorter_timeout() {
        let url = Url::parse("http://localhost:5000").unwrap();

        let slow = HttpGateway::new(url.clone(), Duration::from_secs(90)).unwrap();
        assert_eq!(slow.submit_timeout(), SUBMIT_TIMEOUT);

        let quick = HttpGateway::new(url, Duration::from_secs(2)).unwrap();
        assert_eq!(quick.submit_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_endpoint_escapes_session_code() {
        let root = gateway("http://localhost:5000");
        assert_eq!(
            root.endpoint(&["get-quiz", "A B/C"]).as_str(),
            "http://localhost:5000/get-quiz/A%20B%2FC"
        );
    }

    #[test]
    fn test_empty_quiz_is_rejected() {
        let err = into_questions("/generate-quiz".to_string(), Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidQuiz {
                source: QuizContentError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_question_reports_its_position() {
        let wire = vec![
            WireQuestion {
                question: "1 + 1?".to_string(),
                options: vec!["2".to_string(), "3".to_string()],
                answer: "2".to_string(),
            },
            WireQuestion {
                question: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "5".to_string()],
                answer: "4".to_string(),
            },
        ];

        let err = into_questions("/get-quiz/X".to_string(), wire).unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidQuiz {
                source: QuizContentError::Question { index: 1, .. },
                ..
            }
        ));
    }
}
