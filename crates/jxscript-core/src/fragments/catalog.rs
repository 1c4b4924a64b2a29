//! The standard fragments.
//!
//! Hand-authored, ES5-only bodies. They assume the harness has bound the
//! application handle as `app`. Each must pass the full validator once
//! assembled, so: no arrow functions, no direct object-literal returns,
//! no console output.

use super::Fragment;

const SAFE_GET: &str = r#"function safeGet(getter, fallback) {
  try {
    var value = getter();
    return (value === null || typeof value === "undefined") ? fallback : value;
  } catch (e) {
    return fallback;
  }
}"#;

const FIND_DATABASE: &str = r#"function findDatabase(name) {
  if (!name) {
    return app.currentDatabase();
  }
  var databases = app.databases();
  for (var i = 0; i < databases.length; i++) {
    if (databases[i].name() === name) {
      return databases[i];
    }
  }
  return null;
}"#;

const GET_RECORD: &str = r#"function getRecord(uuid, recordId, databaseName) {
  if (uuid) {
    var byUuid = app.getRecordWithUuid(uuid);
    if (byUuid) {
      return byUuid;
    }
  }
  if (recordId !== null && typeof recordId !== "undefined") {
    var database = findDatabase(databaseName);
    if (database) {
      return database.getRecordWithId(recordId);
    }
  }
  return null;
}"#;

const IS_GROUP: &str = r#"function isGroup(record) {
  var kind = String(record.type()).toLowerCase();
  return kind === "group" || kind === "smart group";
}"#;

const RECORD_SUMMARY: &str = r#"function recordSummary(record) {
  var summary = {};
  summary.uuid = safeGet(function () { return record.uuid(); }, null);
  summary.name = safeGet(function () { return record.name(); }, "");
  summary.type = safeGet(function () { return String(record.type()); }, "unknown");
  summary.location = safeGet(function () { return record.location(); }, "");
  summary.tags = safeGet(function () { return record.tags(); }, []);
  return summary;
}"#;

const COLLECT_CHILDREN: &str = r#"function collectChildren(group, maxDepth, depth, results) {
  var level = depth || 0;
  var found = results || [];
  var children = group.children();
  for (var i = 0; i < children.length; i++) {
    var child = children[i];
    found.push(recordSummary(child));
    if (isGroup(child) && level + 1 < maxDepth) {
      collectChildren(child, maxDepth, level + 1, found);
    }
  }
  return found;
}"#;

const SUCCESS_RESULT: &str = r#"function successResult(data) {
  var result = {};
  result.success = true;
  result.data = data;
  return JSON.stringify(result);
}"#;

const ERROR_RESULT: &str = r#"function errorResult(message, details) {
  var result = {};
  result.success = false;
  result.error = String(message);
  if (details) {
    result.details = details;
  }
  return JSON.stringify(result);
}"#;

const RUN_AI_REQUEST: &str = r#"function runAiRequest(prompt, records, options) {
  var settings = options || {};
  var request = {};
  if (records && records.length > 0) {
    request.record = records;
  }
  if (settings.engine) {
    request.engine = settings.engine;
  }
  if (settings.model) {
    request.model = settings.model;
  }
  if (typeof settings.temperature === "number") {
    request.temperature = settings.temperature;
  }
  request.as = settings.format || "text";
  return safeGet(function () { return app.getChatResponseForMessage(prompt, request); }, null);
}"#;

const PARSE_AI_RESPONSE: &str = r#"function parseAiResponse(response) {
  if (response === null || typeof response === "undefined") {
    return null;
  }
  if (typeof response !== "string") {
    return response;
  }
  var text = String(response).trim();
  var start = text.indexOf("{");
  var end = text.lastIndexOf("}");
  if (start !== -1 && end > start) {
    try {
      return JSON.parse(text.substring(start, end + 1));
    } catch (e) {
      return text;
    }
  }
  return text;
}"#;

/// `(name, fragment)` pairs for the standard library, in authoring order.
pub(super) fn standard_fragments() -> Vec<(&'static str, Fragment)> {
    vec![
        ("safeGet", Fragment::new(SAFE_GET)),
        ("findDatabase", Fragment::new(FIND_DATABASE)),
        ("getRecord", Fragment::new(GET_RECORD).depends_on(["findDatabase"])),
        ("isGroup", Fragment::new(IS_GROUP)),
        ("recordSummary", Fragment::new(RECORD_SUMMARY).depends_on(["safeGet"])),
        (
            "collectChildren",
            Fragment::new(COLLECT_CHILDREN).depends_on(["isGroup", "recordSummary"]),
        ),
        ("successResult", Fragment::new(SUCCESS_RESULT).depends_on(["JSON"])),
        ("errorResult", Fragment::new(ERROR_RESULT).depends_on(["JSON"])),
        ("runAiRequest", Fragment::new(RUN_AI_REQUEST).depends_on(["safeGet"])),
        ("parseAiResponse", Fragment::new(PARSE_AI_RESPONSE).depends_on(["JSON"])),
    ]
}
