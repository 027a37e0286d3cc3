//! Protocol decoding modules, one per IrDA layer.
//!
//! Each protocol follows a layered structure:
//! - `layout`: bit masks, constants and value tables (source of truth)
//! - `parser`: domain-level decoding against the shared [`common::reader`]
//!   cursor and [`common::tree`] output sink
//!
//! Decoders are pure apart from the conversation histories they append to;
//! capture sources and the analysis layer handle file access and aggregation.
//!
//! Version française (résumé):
//! Un module par couche IrDA (IrLAP, IrLMP, IAP, TTP, IrCOMM). Les positions et
//! tables sont dans `layout`, le décodage dans `parser`.

pub mod common;
pub mod iap;
pub mod ircomm;
pub mod irlap;
pub mod irlmp;
pub mod ttp;
