use cbor_types::{ByteStringFormat, ContentHandler, HandlerError, SemanticTag, SerializingContext};
use serde::Serialize;

/// Event tallies for `stats` and `validate`.
///
/// Counts every event kind without retaining any values, so arbitrarily
/// large inputs can be summarised in constant memory.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub items: u64,
    pub arrays: u64,
    pub maps: u64,
    pub names: u64,
    pub text_strings: u64,
    pub byte_strings: u64,
    pub unsigned_integers: u64,
    pub negative_integers: u64,
    pub floats: u64,
    pub booleans: u64,
    pub nulls: u64,
    pub bignums: u64,
    pub tagged: u64,
    pub max_depth: usize,
    #[serde(skip)]
    depth: usize,
}

impl Summary {
    fn tag(&mut self, tag: SemanticTag) {
        if tag != SemanticTag::None {
            self.tagged += 1;
        }
    }

    fn open(&mut self, tag: SemanticTag) {
        self.tag(tag);
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl ContentHandler for Summary {
    fn begin_array(
        &mut self,
        _len: Option<usize>,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.arrays += 1;
        self.open(tag);
        Ok(())
    }

    fn end_array(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.close();
        Ok(())
    }

    fn begin_object(
        &mut self,
        _len: Option<usize>,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.maps += 1;
        self.open(tag);
        Ok(())
    }

    fn end_object(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.close();
        Ok(())
    }

    fn name(&mut self, _name: &str, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.names += 1;
        Ok(())
    }

    fn string_value(
        &mut self,
        _value: &str,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.text_strings += 1;
        self.tag(tag);
        Ok(())
    }

    fn byte_string_value(
        &mut self,
        _value: &[u8],
        _format: ByteStringFormat,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.byte_strings += 1;
        self.tag(tag);
        Ok(())
    }

    fn uint64_value(
        &mut self,
        _value: u64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.unsigned_integers += 1;
        self.tag(tag);
        Ok(())
    }

    fn int64_value(
        &mut self,
        _value: i64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.negative_integers += 1;
        self.tag(tag);
        Ok(())
    }

    fn double_value(
        &mut self,
        _value: f64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.floats += 1;
        self.tag(tag);
        Ok(())
    }

    fn bool_value(
        &mut self,
        _value: bool,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.booleans += 1;
        Ok(())
    }

    fn null_value(
        &mut self,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.nulls += 1;
        Ok(())
    }

    fn bignum_value(
        &mut self,
        _decimal: &str,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.bignums += 1;
        self.tagged += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), HandlerError> {
        self.items += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbor_decoder::StreamReader;
    use cbor_wire::SliceSource;

    #[test]
    fn counts_events() {
        // [1, {"a": -1}], 2(h'01')
        let bytes = [0x82, 0x01, 0xA1, 0x61, 0x61, 0x20, 0xC2, 0x41, 0x01];
        let mut reader = StreamReader::new(SliceSource::new(&bytes), Summary::default());
        reader.read_all().unwrap();
        let (_, summary) = reader.into_parts();

        assert_eq!(summary.items, 2);
        assert_eq!(summary.arrays, 1);
        assert_eq!(summary.maps, 1);
        assert_eq!(summary.names, 1);
        assert_eq!(summary.unsigned_integers, 1);
        assert_eq!(summary.negative_integers, 1);
        assert_eq!(summary.bignums, 1);
        assert_eq!(summary.max_depth, 2);
    }
}
