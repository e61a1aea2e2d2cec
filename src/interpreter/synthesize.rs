use crate::models::Patch;

/// Command-line patch. Always carries pockets (possibly fewer than six)
/// and always sets bleeding: this dialect has no "unspecified" state.
pub fn command_line_patch(pockets: Vec<String>, bleeding: bool) -> Patch {
    Patch {
        pockets: Some(pockets),
        pocket: None,
        bleeding: Some(bleeding),
    }
}

/// Voice patch. Only recovered fields are set.
///
/// When a tooth was named but neither a depth nor a bleeding cue was
/// recovered, the utterance is taken as flagging bleeding.
pub fn voice_patch(depth: Option<String>, bleeding: Option<bool>, tooth_named: bool) -> Patch {
    let patch = Patch {
        pockets: None,
        pocket: depth,
        bleeding,
    };
    if patch.is_empty() && tooth_named {
        return Patch {
            bleeding: Some(true),
            ..patch
        };
    }
    patch
}
