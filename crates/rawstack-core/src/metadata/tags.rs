/// How one DNG tag is carried from the reference frame into the merged file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagRule {
    /// Copy the tag as-is.
    Copy(&'static str),
    /// Move the tag from the raw sub-IFD into IFD0, where the merged single
    /// image keeps its raw data.
    FromSubIfd(&'static str),
}

impl TagRule {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Copy(tag) | Self::FromSubIfd(tag) => tag,
        }
    }

    /// exiftool argument implementing the rule.
    pub fn to_arg(&self) -> String {
        match self {
            Self::Copy(tag) => format!("-{tag}"),
            Self::FromSubIfd(tag) => format!("-IFD0:{tag}<SubIFD:{tag}"),
        }
    }
}

/// Tags needed for the merged raster to be read back as a raw DNG.
pub const DNG_TAG_RULES: [TagRule; 19] = [
    TagRule::Copy("DNGVersion"),
    TagRule::Copy("DNGBackwardVersion"),
    TagRule::Copy("ColorMatrix1"),
    TagRule::Copy("ColorMatrix2"),
    TagRule::FromSubIfd("BlackLevelRepeatDim"),
    TagRule::FromSubIfd("PhotometricInterpretation"),
    TagRule::FromSubIfd("CalibrationIlluminant1"),
    TagRule::FromSubIfd("CalibrationIlluminant2"),
    TagRule::Copy("SamplesPerPixel"),
    TagRule::FromSubIfd("CFARepeatPatternDim"),
    TagRule::FromSubIfd("CFAPattern2"),
    TagRule::Copy("AsShotNeutral"),
    TagRule::FromSubIfd("ActiveArea"),
    TagRule::FromSubIfd("DefaultScale"),
    TagRule::FromSubIfd("DefaultCropOrigin"),
    TagRule::FromSubIfd("DefaultCropSize"),
    TagRule::FromSubIfd("OpcodeList1"),
    TagRule::FromSubIfd("OpcodeList2"),
    TagRule::FromSubIfd("OpcodeList3"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_ifd_rules_remap_into_ifd0() {
        assert_eq!(
            TagRule::FromSubIfd("ActiveArea").to_arg(),
            "-IFD0:ActiveArea<SubIFD:ActiveArea"
        );
        assert_eq!(TagRule::Copy("ColorMatrix1").to_arg(), "-ColorMatrix1");
    }

    #[test]
    fn every_tag_appears_once() {
        let mut tags: Vec<_> = DNG_TAG_RULES.iter().map(TagRule::tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), DNG_TAG_RULES.len());
    }
}
