#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod access_scope;
pub mod bin_codec;
pub mod constants;
pub mod data_scope;
pub mod metadata;
pub mod operator;
pub mod viewer;

pub use access_scope::AccessScope;
pub use data_scope::{DataScope, ParseDataScopeError};
pub use metadata::{MetadataError, OPERATOR_HEADER, SIGNATURE_HEADER};
pub use operator::OperatorMetadata;
pub use viewer::{AnonymousViewer, SystemViewer, UserViewer, Viewer, ViewerRef};

pub use bin_codec::{
    OPERATOR_BIN_VERSION, OperatorDecodeError, OperatorEncodeError, decode_bin, encode_bin,
};
