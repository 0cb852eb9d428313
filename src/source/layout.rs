//! Natural-alignment layout oracle.
//!
//! Lays records out the way common C ABIs do: each field at the next offset
//! aligned for its type, union members all at offset zero, and the total
//! size rounded up to the record alignment. Bitfields are packed into
//! storage units of their declared type and never straddle a unit boundary.
//! C++ records get a vtable pointer when dynamic without a dynamic primary
//! base, non-virtual bases in declaration order (empty bases take no
//! space), and virtual bases after the fields, each placed once.

use tracing::trace;

use super::{AstProvider, DeclId, DeclKind, LayoutOracle, RecordLayout, SourceType, TargetInfo, TypeId, TypeLayout};
use crate::error::LayoutError;

/// Reference [`LayoutOracle`] over any [`AstProvider`].
pub struct NaturalLayout<'a, A> {
    ast: &'a A,
    target: TargetInfo,
}

/// Full layout of one record, in bits.
#[derive(Debug)]
struct Computed {
    size: u64,
    align: u64,
    /// Size without virtual bases, rounded to `nv_align`.
    nv_size: u64,
    nv_align: u64,
    field_offsets: Vec<u64>,
    bases: Vec<(DeclId, u64)>,
    vbases: Vec<(DeclId, u64)>,
    /// Every virtual base in the hierarchy, canonical, in placement order.
    all_vbases: Vec<DeclId>,
    is_dynamic: bool,
    is_empty: bool,
}

fn align_to(offset: u64, align: u64) -> u64 {
    if align <= 1 {
        offset
    } else {
        offset.div_ceil(align) * align
    }
}

impl<'a, A: AstProvider> NaturalLayout<'a, A> {
    pub fn new(ast: &'a A, target: TargetInfo) -> Self {
        Self { ast, target }
    }

    pub fn target(&self) -> &TargetInfo {
        &self.target
    }

    fn display_name(&self, record: DeclId) -> String {
        let name = &self.ast.decl(record).name;
        if name.is_empty() {
            format!("(anonymous #{})", record.0)
        } else {
            name.clone()
        }
    }

    fn layout_of(&self, ty: TypeId, visiting: &mut Vec<DeclId>) -> Result<TypeLayout, LayoutError> {
        match self.ast.ty(ty) {
            SourceType::Builtin(kind) => self
                .target
                .builtin(*kind)
                .ok_or_else(|| LayoutError::NoLayout(kind.c_spelling().to_string())),
            SourceType::Pointer(_)
            | SourceType::LValueReference(_)
            | SourceType::RValueReference(_)
            | SourceType::ObjCObjectPointer { .. } => Ok(self.target.pointer),
            SourceType::ConstantArray { element, size } => {
                let el = self.layout_of(*element, visiting)?;
                let bits = el
                    .bit_size
                    .checked_mul(*size)
                    .ok_or_else(|| LayoutError::TooLarge(format!("array of {size} elements")))?;
                Ok(TypeLayout::bits(bits, el.bit_alignment))
            }
            SourceType::IncompleteArray { element } | SourceType::VariableArray { element } => {
                let el = self.layout_of(*element, visiting)?;
                Ok(TypeLayout::bits(0, el.bit_alignment))
            }
            SourceType::Record(record) => {
                let computed = self.compute(*record, visiting)?;
                Ok(TypeLayout::bits(computed.size, computed.align))
            }
            SourceType::Enum(_) => Ok(self.target.int),
            SourceType::Typedef(decl) => match &self.ast.decl(*decl).kind {
                DeclKind::Typedef(t) | DeclKind::TypeAlias(t) => self.layout_of(t.underlying, visiting),
                _ => Err(LayoutError::NoLayout(self.ast.decl(*decl).name.clone())),
            },
            SourceType::Elaborated(inner) | SourceType::Paren(inner) => self.layout_of(*inner, visiting),
            SourceType::Function(_) => Err(LayoutError::NoLayout("function type".to_string())),
            SourceType::TemplateSpecialization { record: Some(record), .. } => {
                let computed = self.compute(*record, visiting)?;
                Ok(TypeLayout::bits(computed.size, computed.align))
            }
            SourceType::TemplateSpecialization { template_name, .. } => {
                Err(LayoutError::Dependent(template_name.clone()))
            }
            SourceType::TemplateTypeParm { name } => Err(LayoutError::Dependent(name.clone())),
            SourceType::Unsupported { spelling } => Err(LayoutError::NoLayout(spelling.clone())),
        }
    }

    fn compute(&self, record: DeclId, visiting: &mut Vec<DeclId>) -> Result<Computed, LayoutError> {
        let canonical = self.ast.canonical_decl(record);
        if visiting.contains(&canonical) {
            return Err(LayoutError::Recursive(self.display_name(record)));
        }
        visiting.push(canonical);
        let result = self.compute_record(record, visiting);
        visiting.pop();
        result
    }

    fn compute_record(&self, record: DeclId, visiting: &mut Vec<DeclId>) -> Result<Computed, LayoutError> {
        let decl = self.ast.decl(record);
        let Some(rec) = decl.as_record() else {
            return Err(LayoutError::NoLayout(self.display_name(record)));
        };
        if !rec.is_complete {
            return Err(LayoutError::Incomplete(self.display_name(record)));
        }
        if rec.is_dependent() {
            return Err(LayoutError::Dependent(self.display_name(record)));
        }
        trace!(record = %self.display_name(record), "computing natural layout");

        let mut offset = 0u64;
        let mut align = 8u64;
        let mut bases = Vec::new();
        let mut vbases = Vec::new();
        let mut all_vbases: Vec<DeclId> = Vec::new();
        let mut is_dynamic = rec.members.iter().any(|m| {
            matches!(&self.ast.decl(*m).kind, DeclKind::Method(method) if method.is_virtual)
        });
        let mut bases_empty = true;

        if let Some(cxx) = &rec.cxx {
            let mut direct = Vec::new();
            for base in &cxx.bases {
                let computed = self.compute(base.record, visiting)?;
                let base_id = self.ast.canonical_decl(base.record);
                is_dynamic |= base.is_virtual || computed.is_dynamic;
                bases_empty &= computed.is_empty && !base.is_virtual;
                for inherited in &computed.all_vbases {
                    if !all_vbases.contains(inherited) {
                        all_vbases.push(*inherited);
                    }
                }
                if base.is_virtual {
                    if !all_vbases.contains(&base_id) {
                        all_vbases.push(base_id);
                    }
                } else {
                    direct.push((base_id, computed));
                }
            }

            let primary = direct.iter().position(|(_, c)| c.is_dynamic);
            if is_dynamic && primary.is_none() {
                offset = self.target.pointer.bit_size;
                align = align.max(self.target.pointer.bit_alignment);
            }
            if let Some(index) = primary {
                let entry = direct.remove(index);
                direct.insert(0, entry);
            }
            for (base_id, computed) in direct {
                align = align.max(computed.nv_align);
                if computed.is_empty {
                    bases.push((base_id, 0));
                    continue;
                }
                offset = align_to(offset, computed.nv_align);
                bases.push((base_id, offset));
                offset += computed.nv_size;
            }
        }

        let mut field_offsets = Vec::new();
        let mut union_size = 0u64;
        let mut has_fields = false;
        for member in &rec.members {
            let Some(field) = self.ast.decl(*member).as_field() else {
                continue;
            };
            has_fields = true;
            let layout = self.layout_of(field.ty, visiting)?;
            let unit = layout.bit_alignment.max(1);
            if rec.is_union() {
                field_offsets.push(0);
                let width = field.bit_width.map_or(layout.bit_size, u64::from);
                union_size = union_size.max(width);
                align = align.max(layout.bit_alignment);
                continue;
            }
            match field.bit_width {
                Some(0) => {
                    offset = align_to(offset, unit);
                    field_offsets.push(offset);
                }
                Some(width) => {
                    let width = u64::from(width);
                    if offset / unit != (offset + width - 1) / unit {
                        offset = align_to(offset, unit);
                    }
                    field_offsets.push(offset);
                    offset += width;
                    align = align.max(layout.bit_alignment);
                }
                None => {
                    offset = align_to(offset, unit);
                    field_offsets.push(offset);
                    offset = offset
                        .checked_add(layout.bit_size)
                        .ok_or_else(|| LayoutError::TooLarge(self.display_name(record)))?;
                    align = align.max(layout.bit_alignment);
                }
            }
        }
        if rec.is_union() {
            offset = offset.max(union_size);
        }

        let nv_align = align;
        let nv_size = align_to(offset, nv_align);

        for vbase in &all_vbases {
            let computed = self.compute(*vbase, visiting)?;
            align = align.max(computed.nv_align);
            if computed.is_empty {
                vbases.push((*vbase, 0));
                continue;
            }
            offset = align_to(offset, computed.nv_align);
            vbases.push((*vbase, offset));
            offset += computed.nv_size;
        }

        let mut size = align_to(offset, align);
        if size == 0 && rec.cxx.is_some() {
            size = 8;
        }
        Ok(Computed {
            size,
            align,
            nv_size,
            nv_align,
            field_offsets,
            bases,
            vbases,
            all_vbases,
            is_dynamic,
            is_empty: rec.cxx.is_some() && !has_fields && !is_dynamic && bases_empty,
        })
    }

    fn not_a_base(&self, record: DeclId, base: DeclId) -> LayoutError {
        LayoutError::NotABase {
            record: self.display_name(record),
            base: self.display_name(base),
        }
    }
}

impl<A: AstProvider> LayoutOracle for NaturalLayout<'_, A> {
    fn type_layout(&self, ty: TypeId) -> Result<TypeLayout, LayoutError> {
        self.layout_of(ty, &mut Vec::new())
    }

    fn record_layout(&self, record: DeclId) -> Result<RecordLayout, LayoutError> {
        let computed = self.compute(record, &mut Vec::new())?;
        Ok(RecordLayout {
            bit_size: computed.size,
            bit_alignment: computed.align,
            field_offsets: computed.field_offsets,
        })
    }

    fn base_offset(&self, record: DeclId, base: DeclId) -> Result<u64, LayoutError> {
        let computed = self.compute(record, &mut Vec::new())?;
        let base_id = self.ast.canonical_decl(base);
        computed
            .bases
            .iter()
            .find(|(id, _)| *id == base_id)
            .map(|(_, bits)| bits / 8)
            .ok_or_else(|| self.not_a_base(record, base))
    }

    fn vbase_offset(&self, record: DeclId, base: DeclId) -> Result<u64, LayoutError> {
        let computed = self.compute(record, &mut Vec::new())?;
        let base_id = self.ast.canonical_decl(base);
        computed
            .vbases
            .iter()
            .find(|(id, _)| *id == base_id)
            .map(|(_, bits)| bits / 8)
            .ok_or_else(|| self.not_a_base(record, base))
    }
}
