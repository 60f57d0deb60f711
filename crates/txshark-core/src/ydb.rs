//! Hand-written subset of the Ydb.Table service messages.
//!
//! Only the fields the analyzer reads are declared; protobuf skips unknown
//! tags, so real captures decode fine against this subset. Tags match the
//! public YDB API definitions.

/// Request that executes one data query inside a session, possibly opening
/// a transaction via `tx_control`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteDataQueryRequest {
    #[prost(string, tag = "1")]
    pub session_id: String,
    #[prost(message, optional, tag = "2")]
    pub tx_control: Option<TransactionControl>,
    #[prost(message, optional, tag = "3")]
    pub query: Option<Query>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionControl {
    #[prost(oneof = "TxSelector", tags = "1, 2")]
    pub tx_selector: Option<TxSelector>,
    #[prost(bool, tag = "10")]
    pub commit_tx: bool,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum TxSelector {
    /// Opens a new transaction.
    #[prost(message, tag = "1")]
    BeginTx(TransactionSettings),
    /// Continues the transaction with this id.
    #[prost(string, tag = "2")]
    TxId(String),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionSettings {
    #[prost(oneof = "TxMode", tags = "1")]
    pub tx_mode: Option<TxMode>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum TxMode {
    #[prost(message, tag = "1")]
    SerializableReadWrite(SerializableModeSettings),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SerializableModeSettings {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(oneof = "QueryKind", tags = "1, 2")]
    pub query: Option<QueryKind>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum QueryKind {
    #[prost(string, tag = "1")]
    YqlText(String),
    #[prost(string, tag = "2")]
    Id(String),
}

impl Query {
    /// The inline YQL text, or `""` for prepared-query-by-id requests.
    pub fn yql_text(&self) -> &str {
        match &self.query {
            Some(QueryKind::YqlText(text)) => text,
            _ => "",
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteDataQueryResponse {
    #[prost(message, optional, tag = "1")]
    pub operation: Option<Operation>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitTransactionRequest {
    #[prost(string, tag = "1")]
    pub session_id: String,
    #[prost(string, tag = "2")]
    pub tx_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitTransactionResponse {
    #[prost(message, optional, tag = "1")]
    pub operation: Option<Operation>,
}

/// Long-operation envelope every Ydb response carries.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Operation {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(bool, tag = "2")]
    pub ready: bool,
    #[prost(int32, tag = "3")]
    pub status: i32,
}
