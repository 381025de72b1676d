use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::lang::{LanguageSpec, LANGUAGE_ID};
use crate::lsp::document::DocumentState;
use crate::lsp::handlers::{
    HandleCodeAction, HandleCompletion, HandleDefinition, HandleDiagnostics, HandleDocumentSymbol,
    HandleHover,
};
use crate::validation::DiagnosticSink;
use crate::Config;

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub language: Arc<LanguageSpec>,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub sink: Arc<Mutex<DiagnosticSink>>,
    pub config: Config,
}

impl Backend {
    pub fn new(client: Client, config: Config, language: LanguageSpec) -> Self {
        Self {
            client,
            language: Arc::new(language),
            documents: Arc::new(Mutex::new(HashMap::new())),
            sink: Arc::new(Mutex::new(DiagnosticSink::new())),
            config,
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        _: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![
                        "$".to_string(),
                        "@".to_string(),
                        "#".to_string(),
                        ":".to_string(),
                    ]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                definition_provider: Some(OneOf::Left(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "aspscript-language-server initialized")
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    async fn hover(&self, params: HoverParams) -> tower_lsp::jsonrpc::Result<Option<Hover>> {
        self.handle_hover(params).await
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> tower_lsp::jsonrpc::Result<Option<CompletionResponse>> {
        self.handle_completion(params).await
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> tower_lsp::jsonrpc::Result<Option<DocumentSymbolResponse>> {
        self.handle_document_symbol(params).await
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> tower_lsp::jsonrpc::Result<Option<GotoDefinitionResponse>> {
        self.handle_definition(params).await
    }

    async fn code_action(
        &self,
        params: CodeActionParams,
    ) -> tower_lsp::jsonrpc::Result<Option<CodeActionResponse>> {
        self.handle_code_action(params).await
    }

    // Store opened documents for hover/diagnostics
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        // Only engage on AspScript documents
        if params.text_document.language_id != LANGUAGE_ID {
            return;
        }

        let uri = params.text_document.uri.clone();
        let content = params.text_document.text;

        let mut docs = self.documents.lock().await;
        docs.insert(uri.clone(), DocumentState { content });
        drop(docs); // Release the lock before calling publish_diagnostics

        // Publish diagnostics for the opened document
        self.publish_diagnostics(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut docs = self.documents.lock().await;
            // Documents that never passed the language gate are not tracked
            if !docs.contains_key(&uri) {
                return;
            }
            docs.insert(
                uri.clone(),
                DocumentState {
                    content: change.text,
                },
            );
            drop(docs); // Release the lock before calling publish_diagnostics

            // Publish updated diagnostics
            self.publish_diagnostics(uri).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let mut docs = self.documents.lock().await;
        if docs.remove(&uri).is_none() {
            return;
        }
        drop(docs);

        let mut sink = self.sink.lock().await;
        sink.remove(uri.as_str());
        drop(sink);

        // Clear any published diagnostics for the closed document
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }
}
