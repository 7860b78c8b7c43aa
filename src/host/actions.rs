//! Built-in handlers for configured routes.

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::config::RouteAction;
use crate::error::DispatchError;
use crate::http::Body;
use crate::routing::{async_handler, handler_fn, SharedHandler};

/// Build the handler for a configured action.
pub fn handler_for(action: &RouteAction) -> SharedHandler {
    match action.clone() {
        RouteAction::Respond {
            status,
            headers,
            body,
            echo_params,
        } => handler_fn(move |cx| {
            cx.response.set_status(status);
            for (name, value) in &headers {
                cx.response.headers_mut().set(name, value.clone());
            }
            let body = match (&body, echo_params) {
                (body, false) => body.clone(),
                (body, true) => {
                    let params = serde_json::to_value(&cx.request.route_params)?;
                    let mut object = match body {
                        Some(Value::Object(map)) => map.clone(),
                        Some(other) => Map::from_iter([("body".to_string(), other.clone())]),
                        None => Map::new(),
                    };
                    object.insert("params".to_string(), params);
                    Some(Value::Object(object))
                }
            };
            if let Some(value) = body {
                cx.response.set_body(Body::Value(value));
            }
            cx.response.end();
            Ok(())
        }),
        RouteAction::SetHeader { name, value } => handler_fn(move |cx| {
            cx.response.headers_mut().set(&name, value.clone());
            Ok(())
        }),
        RouteAction::Fail { message } => handler_fn(move |_| Err(DispatchError::msg(&message))),
        RouteAction::RenderError { status } => handler_fn(move |cx| {
            let message = cx.error().map(ToString::to_string).unwrap_or_default();
            cx.response.set_status(status);
            cx.response.set_body(Body::Value(json!({ "error": message })));
            cx.response.end();
            Ok(())
        }),
        RouteAction::Delay { ms } => async_handler(move |_| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            })
        }),
    }
}
