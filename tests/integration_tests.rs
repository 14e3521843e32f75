//! Integration tests against the live Gemini API.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use edu_assistant::chat::prompt::SYSTEM_INSTRUCTION;
    use edu_assistant::chat::{ChatApp, PlainTextRenderer};
    use edu_assistant::theme::ThemeCycle;
    use edu_assistant::{GeminiClient, KnownModel, Model, ModelService, ModelSession, Role};

    fn api_key() -> Option<String> {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
        }
        api_key
    }

    #[tokio::test]
    async fn test_streaming_response() {
        let Some(api_key) = api_key() else {
            return;
        };

        let client = GeminiClient::new(Some(api_key)).expect("Failed to create client");
        let mut session = client
            .open_session(&Model::Known(KnownModel::Gemini25Flash), "Answer tersely.")
            .expect("Failed to open session");

        let mut stream = session
            .send_streaming("Count to 3")
            .await
            .expect("Stream request should succeed");
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            text.push_str(&chunk.expect("chunk should arrive").text);
        }
        assert!(!text.is_empty(), "reply should not be empty");
    }

    #[tokio::test]
    async fn test_session_remembers_previous_turn() {
        let Some(api_key) = api_key() else {
            return;
        };

        let client = GeminiClient::new(Some(api_key)).expect("Failed to create client");
        let mut session = client
            .open_session(&Model::default(), "Answer tersely.")
            .expect("Failed to open session");
        let mut first = session.send_streaming("My name is Ada.").await.unwrap();
        while first.next().await.is_some() {}
        drop(first);

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Some(Role::User));
        assert_eq!(history[1].role, Some(Role::Model));
    }

    #[tokio::test]
    async fn test_chat_app_round_trip() {
        let Some(api_key) = api_key() else {
            return;
        };

        let client = GeminiClient::new(Some(api_key)).expect("Failed to create client");
        let mut app = ChatApp::new(Model::default(), ThemeCycle::default());
        app.connect(&client, SYSTEM_INSTRUCTION);
        assert!(app.has_session());

        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        assert!(app.send("What is PROJ-BLE?", &mut renderer).await);
        assert!(!app.is_loading());
        assert_eq!(app.conversation().len(), 3);
        assert!(!app.conversation().last().unwrap().content.is_empty());
    }
}
