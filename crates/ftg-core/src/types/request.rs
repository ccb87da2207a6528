//! Fixed-size engine request record and field population.
//!
//! One record type covers all request operations: each operation populates a
//! subset of the fields and leaves the rest zero-initialized, exactly like the
//! engine's `memset`-then-fill request structs. Fields are addressed by the
//! engine's field names (`"BrokerID"`, `"InstrumentID"`, ...) so the request
//! facade can copy named fields straight out of a JSON record.

use serde_json::Value;

use super::enums::RequestKind;
use super::fixed::*;

/// A zero-initialized, fixed-width engine request record.
///
/// String fields are fixed byte arrays with the widths documented in
/// [`fixed`](super::fixed); oversized input is truncated, never rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    /// Which operation this record carries.
    pub kind: RequestKind,

    pub broker_id: [u8; BROKER_ID_LEN],
    pub user_id: [u8; USER_ID_LEN],
    pub investor_id: [u8; INVESTOR_ID_LEN],
    pub account_id: [u8; ACCOUNT_ID_LEN],
    pub instrument_id: [u8; INSTRUMENT_ID_LEN],
    pub exchange_id: [u8; EXCHANGE_ID_LEN],
    pub order_ref: [u8; ORDER_REF_LEN],
    pub order_sys_id: [u8; ORDER_SYS_ID_LEN],
    pub parked_order_id: [u8; PARKED_ORDER_ID_LEN],
    pub parked_order_action_id: [u8; PARKED_ORDER_ID_LEN],
    pub password: [u8; PASSWORD_LEN],
    pub old_password: [u8; PASSWORD_LEN],
    pub new_password: [u8; PASSWORD_LEN],
    pub captcha: [u8; PASSWORD_LEN],
    pub text: [u8; PASSWORD_LEN],
    pub otp_password: [u8; PASSWORD_LEN],
    pub auth_code: [u8; AUTH_CODE_LEN],
    pub app_id: [u8; APP_ID_LEN],
    pub user_product_info: [u8; PRODUCT_INFO_LEN],

    /// Direction code (`b'0'` buy, `b'1'` sell, `0` unset).
    pub direction: u8,
    /// Offset flag code (`b'0'` open, `b'1'` close, `0` unset).
    pub offset_flag: u8,
    pub limit_price: f64,
    pub volume_total_original: i32,
}

impl RequestRecord {
    /// Create a zero-initialized record for the given operation.
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            broker_id: [0; BROKER_ID_LEN],
            user_id: [0; USER_ID_LEN],
            investor_id: [0; INVESTOR_ID_LEN],
            account_id: [0; ACCOUNT_ID_LEN],
            instrument_id: [0; INSTRUMENT_ID_LEN],
            exchange_id: [0; EXCHANGE_ID_LEN],
            order_ref: [0; ORDER_REF_LEN],
            order_sys_id: [0; ORDER_SYS_ID_LEN],
            parked_order_id: [0; PARKED_ORDER_ID_LEN],
            parked_order_action_id: [0; PARKED_ORDER_ID_LEN],
            password: [0; PASSWORD_LEN],
            old_password: [0; PASSWORD_LEN],
            new_password: [0; PASSWORD_LEN],
            captcha: [0; PASSWORD_LEN],
            text: [0; PASSWORD_LEN],
            otp_password: [0; PASSWORD_LEN],
            auth_code: [0; AUTH_CODE_LEN],
            app_id: [0; APP_ID_LEN],
            user_product_info: [0; PRODUCT_INFO_LEN],
            direction: 0,
            offset_flag: 0,
            limit_price: 0.0,
            volume_total_original: 0,
        }
    }

    /// Populate one field by its engine field name.
    ///
    /// String values land in string fields with truncation to the field
    /// width; numeric values land in numeric fields. A value of the wrong
    /// JSON type for a field, or an unknown field name, is ignored.
    pub fn set_field(&mut self, name: &str, value: &Value) {
        match name {
            "BrokerID" => copy_str(&mut self.broker_id, value),
            "UserID" => copy_str(&mut self.user_id, value),
            "InvestorID" => copy_str(&mut self.investor_id, value),
            "AccountID" => copy_str(&mut self.account_id, value),
            "InstrumentID" => copy_str(&mut self.instrument_id, value),
            "ExchangeID" => copy_str(&mut self.exchange_id, value),
            "OrderRef" => copy_str(&mut self.order_ref, value),
            "OrderSysID" => copy_str(&mut self.order_sys_id, value),
            "ParkedOrderID" => copy_str(&mut self.parked_order_id, value),
            "ParkedOrderActionID" => copy_str(&mut self.parked_order_action_id, value),
            "Password" => copy_str(&mut self.password, value),
            "OldPassword" => copy_str(&mut self.old_password, value),
            "NewPassword" => copy_str(&mut self.new_password, value),
            "Captcha" => copy_str(&mut self.captcha, value),
            "Text" => copy_str(&mut self.text, value),
            "OTPPassword" => copy_str(&mut self.otp_password, value),
            "AuthCode" => copy_str(&mut self.auth_code, value),
            "AppID" => copy_str(&mut self.app_id, value),
            "UserProductInfo" => copy_str(&mut self.user_product_info, value),
            "Direction" => self.direction = code_byte(value),
            "CombOffsetFlag" => self.offset_flag = code_byte(value),
            "LimitPrice" => {
                if let Some(px) = value.as_f64() {
                    self.limit_price = px;
                }
            }
            "VolumeTotalOriginal" => {
                if let Some(vol) = value.as_i64() {
                    self.volume_total_original = vol as i32;
                }
            }
            _ => {}
        }
    }
}

/// Copy a JSON string value into a fixed field; non-strings are ignored.
fn copy_str<const N: usize>(buf: &mut [u8; N], value: &Value) {
    if let Some(s) = value.as_str() {
        write_field(buf, s);
    }
}

/// Single-character code fields (direction, offset flag) accept either a
/// one-character string (`"0"`) or an integer code.
fn code_byte(value: &Value) -> u8 {
    match value {
        Value::String(s) => s.as_bytes().first().copied().unwrap_or(0),
        Value::Number(n) => n.as_u64().map(|v| v as u8).unwrap_or(0),
        _ => 0,
    }
}
