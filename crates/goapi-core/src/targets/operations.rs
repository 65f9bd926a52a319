use log::debug;
use serde::Serialize;

use crate::config::TargetKind;
use crate::ir::GoType;
use crate::model::{Operation, ParameterLocation, preferred_content};
use crate::transform::TypeResolver;

use super::{TargetContext, TargetOutput, TargetPass};

/// Per-operation type data for the server, strict-server and client targets.
#[derive(Debug, Clone, Serialize)]
pub struct OperationTypes {
    pub id: String,
    pub go_name: String,
    pub method: &'static str,
    pub path: String,
    /// Router path for server targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    pub parameters: Vec<ParameterType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<BodyType>,
    pub responses: Vec<ResponseType>,
    /// Strict server: `{Op}RequestObject`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_object: Option<String>,
    /// Strict server: `{Op}ResponseObject`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_object: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterType {
    pub name: String,
    pub go_name: String,
    /// Local variable / argument name; Go keywords get a trailing `_`.
    pub var_name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub go_type: GoType,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyType {
    pub media_type: String,
    pub required: bool,
    pub go_type: GoType,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseType {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_type: Option<GoType>,
    /// Strict server: `{Op}{Status}JSONResponse` or `{Op}{Status}Response`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_name: Option<String>,
}

/// Walks the operations that pass the tag filters.
pub struct OperationPass {
    kind: TargetKind,
}

impl OperationPass {
    pub fn new(kind: TargetKind) -> Self {
        Self { kind }
    }

    fn operation_types(
        &self,
        ctx: &TargetContext<'_>,
        resolver: &mut TypeResolver<'_>,
        op: &Operation,
    ) -> OperationTypes {
        let go_name = ctx.normalizer.identifier(&op.name_source());
        let strict = self.kind == TargetKind::StrictServer;

        let parameters = op
            .parameters
            .iter()
            .map(|param| {
                let names = ctx.normalizer.normalize(&param.name);
                ParameterType {
                    name: param.name.clone(),
                    go_name: names.pascal_case,
                    var_name: names.camel_case,
                    location: param.location,
                    required: param.required || param.location == ParameterLocation::Path,
                    go_type: resolver.resolve_optional(
                        param.schema.as_ref(),
                        &go_name,
                        &param.name,
                    ),
                }
            })
            .collect();

        let request_body = op.request_body.as_ref().and_then(|body| {
            let (media_type, content) = preferred_content(&body.content)?;
            Some(BodyType {
                media_type: media_type.clone(),
                required: body.required,
                go_type: resolver.resolve_optional(content.schema.as_ref(), &go_name, "Body"),
            })
        });

        let responses = op
            .responses
            .iter()
            .map(|(status, response)| {
                let content = preferred_content(&response.content);
                let go_type = content.map(|(_, media)| {
                    resolver.resolve_optional(
                        media.schema.as_ref(),
                        &go_name,
                        &format!("{status}ResponseBody"),
                    )
                });
                let response_name = strict.then(|| {
                    let status = ctx.normalizer.pascal_case(status);
                    match content {
                        Some((media_type, _)) if is_json(media_type) => {
                            format!("{go_name}{status}JSONResponse")
                        }
                        _ => format!("{go_name}{status}Response"),
                    }
                });
                ResponseType {
                    status: status.clone(),
                    media_type: content.map(|(media_type, _)| media_type.clone()),
                    go_type,
                    response_name,
                }
            })
            .collect();

        let route = match self.kind {
            TargetKind::Server | TargetKind::StrictServer => {
                Some(ctx.config.go.server_framework.convert_path(&op.path))
            }
            _ => None,
        };

        OperationTypes {
            id: op.id.clone(),
            method: op.method.as_str(),
            path: op.path.clone(),
            route,
            summary: op.summary.clone(),
            deprecated: op.deprecated,
            parameters,
            request_body,
            responses,
            request_object: strict.then(|| format!("{go_name}RequestObject")),
            response_object: strict.then(|| format!("{go_name}ResponseObject")),
            go_name,
        }
    }
}

impl TargetPass for OperationPass {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    fn run(&self, ctx: &TargetContext<'_>) -> TargetOutput {
        let mut resolver = ctx.resolver(self.kind);
        let mut operations = Vec::new();
        for op in &ctx.spec.operations {
            if !ctx.config.accepts_tags(&op.tags) {
                debug!("skipping operation {} (tag filter)", op.id);
                continue;
            }
            operations.push(self.operation_types(ctx, &mut resolver, op));
        }
        ctx.finish(self.kind, resolver, operations)
    }
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use crate::config::{GoapiConfig, TargetKind};
    use crate::generate::Generator;
    use crate::model::from_yaml;

    #[test]
    fn test_parameter_names() {
        let spec = from_yaml(
            r##"
operations:
  - operationId: listItems
    method: get
    path: /items/{item_id}
    parameters:
      - name: item_id
        in: path
        schema:
          type: string
      - name: type
        in: query
        schema:
          type: string
      - name: X-Request-ID
        in: header
        schema:
          type: string
    responses: {}
"##,
        )
        .unwrap();
        let mut config = GoapiConfig::default();
        config.go.targets = vec![TargetKind::Client];
        let output = Generator::new(&config).generate(&spec);
        let op = output
            .target(TargetKind::Client)
            .unwrap()
            .operation("listItems")
            .unwrap();

        let names: Vec<(&str, &str)> = op
            .parameters
            .iter()
            .map(|p| (p.go_name.as_str(), p.var_name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("ItemID", "itemID"),
                ("Type", "type_"),
                ("XRequestID", "xRequestID"),
            ]
        );
        assert!(op.parameters[0].required);
    }
}
