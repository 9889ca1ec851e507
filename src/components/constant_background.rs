use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Background constant in mass

The lineshape is the real parameter **scale** everywhere, so the contribution of a decay channel is
its coupling times **scale**.

- Parameters: **scale**
";
}

#[doc = DOC!()]
#[derive(Clone, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConstantBackground {}

impl ConstantBackground {
    pub fn new() -> Self {
        Self {}
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl LineshapeTrait for ConstantBackground {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::ConstantBackground
    }

    fn val(&self, parameters: ArrayView1<f64>, _bin: usize, _mass: f64) -> Complex64 {
        Complex64::new(parameters[0], 0.0)
    }
}
