use std::collections::HashMap;

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::lsp::backend::Backend;
use crate::parser::{split_document, style_block_span};
use crate::validation::reactive;
use crate::validation::{analyze_document, codes, Severity};

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling completion requests
#[tower_lsp::async_trait]
pub trait HandleCompletion {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>>;
}

/// Trait for handling document symbols
#[tower_lsp::async_trait]
pub trait HandleDocumentSymbol {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>>;
}

/// Trait for handling go-to-definition
#[tower_lsp::async_trait]
pub trait HandleDefinition {
    async fn handle_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> LspResult<Option<GotoDefinitionResponse>>;
}

/// Trait for handling quick-fix code actions
#[tower_lsp::async_trait]
pub trait HandleCodeAction {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;
        let pos = tdpp.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state.content.lines().nth(pos.line as usize).unwrap_or("");
        let Some(token) = token_at(line, pos.character as usize) else {
            return Ok(None);
        };

        if let Some(keyword) = self.language.keyword(&token) {
            let m = MarkupContent {
                kind: MarkupKind::Markdown,
                value: keyword.documentation.clone(),
            };
            return Ok(Some(Hover {
                contents: HoverContents::Markup(m),
                range: None,
            }));
        }

        Ok(None)
    }
}

#[tower_lsp::async_trait]
impl HandleCompletion for Backend {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;

        let docs = self.documents.lock().await;
        if !docs.contains_key(&uri) {
            return Ok(None);
        }
        drop(docs);

        let mut completions = Vec::new();
        let mut seen = std::collections::HashSet::new();

        // Documented keywords first: reactive keywords, lifecycle hooks and
        // the directives that carry long-form documentation
        for keyword in &self.language.keywords {
            seen.insert(keyword.name.clone());
            completions.push(CompletionItem {
                label: keyword.name.clone(),
                kind: Some(completion_kind(&keyword.name)),
                detail: Some(keyword.detail.clone()),
                documentation: Some(Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: keyword.documentation.clone(),
                })),
                ..Default::default()
            });
        }

        // Remaining whitelisted directives get plain items
        for prefix in ['@', '#', ':'] {
            for name in self.language.directive_names(prefix) {
                let label = format!("{prefix}{name}");
                if seen.contains(&label) {
                    continue;
                }
                completions.push(CompletionItem {
                    label,
                    kind: Some(CompletionItemKind::PROPERTY),
                    detail: Some("AspScript directive".to_string()),
                    ..Default::default()
                });
            }
        }

        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDocumentSymbol for Backend {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        // Declarations live in the script section; re-derive them with the
        // same regex families the analyzer uses
        let sections = split_document(&doc_state.content);
        let Some(script) = sections.script else {
            return Ok(Some(DocumentSymbolResponse::Nested(Vec::new())));
        };

        let base = script.start_line - 1; // 0-indexed document line
        let mut symbols = Vec::new();

        for (idx, line) in script.content.lines().enumerate() {
            let line_idx = (base + idx) as u32;

            let families: [(&regex::Regex, &str, SymbolKind); 3] = [
                (&*reactive::STATE_DECL, "$state", SymbolKind::VARIABLE),
                (&*reactive::COMPUTED_DECL, "$computed", SymbolKind::PROPERTY),
                (&*reactive::FUNCTION_DECL, "function", SymbolKind::FUNCTION),
            ];

            for (pattern, detail, kind) in families {
                if let Some(caps) = pattern.captures(line) {
                    let whole = caps.get(0).unwrap();
                    let range = Range::new(
                        Position::new(line_idx, 0),
                        Position::new(line_idx, line.len() as u32),
                    );
                    let selection_range = Range::new(
                        Position::new(line_idx, whole.start() as u32),
                        Position::new(line_idx, whole.end() as u32),
                    );

                    symbols.push(DocumentSymbol {
                        name: caps[1].to_string(),
                        detail: Some(detail.to_string()),
                        kind,
                        tags: None,
                        #[allow(deprecated)]
                        deprecated: Some(false), // Required by tower-lsp 0.20, use tags instead in future versions
                        range,
                        selection_range,
                        children: None,
                    });
                }
            }
        }

        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }
}

#[tower_lsp::async_trait]
impl HandleDefinition for Backend {
    async fn handle_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> LspResult<Option<GotoDefinitionResponse>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;
        let pos = tdpp.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state.content.lines().nth(pos.line as usize).unwrap_or("");
        let Some(word) = word_at(line, pos.character as usize) else {
            return Ok(None);
        };

        let sections = split_document(&doc_state.content);
        let Some(script) = sections.script else {
            return Ok(None);
        };
        let Some((idx, col)) = reactive::find_declaration(script.content, &word) else {
            return Ok(None);
        };

        let line_idx = (script.start_line - 1 + idx) as u32;
        let range = Range::new(
            Position::new(line_idx, col as u32),
            Position::new(line_idx, (col + word.len()) as u32),
        );
        Ok(Some(GotoDefinitionResponse::Scalar(Location::new(
            uri.clone(),
            range,
        ))))
    }
}

#[tower_lsp::async_trait]
impl HandleCodeAction for Backend {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let mut actions: Vec<CodeActionOrCommand> = Vec::new();

        // Fixes are keyed off the stable diagnostic code only
        for diagnostic in &params.context.diagnostics {
            let Some(NumberOrString::String(code)) = &diagnostic.code else {
                continue;
            };

            match code.as_str() {
                codes::STATE_WITHOUT_LET => {
                    let line = diagnostic.range.start.line;
                    let edit = TextEdit {
                        range: Range::new(Position::new(line, 0), Position::new(line, 0)),
                        new_text: "let ".to_string(),
                    };
                    actions.push(quick_fix(
                        "Add \"let\" keyword",
                        &uri,
                        edit,
                        diagnostic.clone(),
                    ));
                }
                codes::EMPTY_STYLE => {
                    if let Some((start, end)) = style_block_span(&doc_state.content) {
                        let edit = TextEdit {
                            range: Range::new(
                                offset_to_position(&doc_state.content, start),
                                offset_to_position(&doc_state.content, end),
                            ),
                            new_text: String::new(),
                        };
                        actions.push(quick_fix(
                            "Remove empty <style> block",
                            &uri,
                            edit,
                            diagnostic.clone(),
                        ));
                    }
                }
                _ => {}
            }
        }

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Publish diagnostics for a document
    async fn publish_diagnostics(&self, uri: Url) {
        if !self.config.lint_enabled {
            return;
        }

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };

        let result = analyze_document(&doc_state.content, &self.language);
        drop(docs);

        // Replace-not-merge: one `set` per run keyed by document identity
        let mut sink = self.sink.lock().await;
        sink.set(uri.as_str(), result.diagnostics);
        let diagnostics: Vec<Diagnostic> = sink
            .get(uri.as_str())
            .unwrap_or_default()
            .iter()
            .map(to_lsp_diagnostic)
            .collect();
        drop(sink);

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

/// The single conversion point from core diagnostics to LSP diagnostics
pub(crate) fn to_lsp_diagnostic(diagnostic: &crate::validation::Diagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    };

    Diagnostic {
        range: Range::new(
            Position::new(
                (diagnostic.range.start_line - 1) as u32,
                diagnostic.range.start_col as u32,
            ),
            Position::new(
                (diagnostic.range.end_line - 1) as u32,
                diagnostic.range.end_col as u32,
            ),
        ),
        severity: Some(severity),
        code: Some(NumberOrString::String(diagnostic.code.to_string())),
        source: Some("aspscript-ls".to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

fn quick_fix(title: &str, uri: &Url, edit: TextEdit, diagnostic: Diagnostic) -> CodeActionOrCommand {
    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![edit]);

    CodeActionOrCommand::CodeAction(CodeAction {
        title: title.to_string(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic]),
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Token under the cursor, including a `$`/`@`/`#`/`:` sigil prefix
fn token_at(line: &str, char_idx: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();

    let mut start = char_idx.min(chars.len());
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = char_idx.min(chars.len());
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    if start > 0 && matches!(chars[start - 1], '$' | '@' | '#' | ':') {
        start -= 1;
    }

    if start >= end {
        return None;
    }
    Some(chars[start..end].iter().collect())
}

/// Identifier under the cursor, sigils excluded
fn word_at(line: &str, char_idx: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();

    let mut start = char_idx.min(chars.len());
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = char_idx.min(chars.len());
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    if start >= end {
        return None;
    }
    Some(chars[start..end].iter().collect())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn completion_kind(name: &str) -> CompletionItemKind {
    match name.chars().next() {
        Some('$') => CompletionItemKind::KEYWORD,
        Some('@') | Some('#') | Some(':') => CompletionItemKind::PROPERTY,
        _ => CompletionItemKind::FUNCTION,
    }
}

/// Byte offset to 0-indexed LSP position
fn offset_to_position(text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count();
    let col = offset - before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    Position::new(line as u32, col as u32)
}
